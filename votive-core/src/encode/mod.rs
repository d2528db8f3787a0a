pub mod assemble;

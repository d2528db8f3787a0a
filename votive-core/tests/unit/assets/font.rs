use super::*;

fn test_font_bytes() -> Option<Vec<u8>> {
    let candidates = std::env::var_os("VOTIVE_TEST_FONT")
        .map(std::path::PathBuf::from)
        .into_iter()
        .chain([std::path::PathBuf::from(
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        )]);
    candidates
        .into_iter()
        .find_map(|p| std::fs::read(p).ok())
}

#[test]
fn garbage_bytes_are_layout_unavailable() {
    let err = ParleyFont::from_bytes(b"not a font".to_vec(), FONT_SIZE_PX).unwrap_err();
    assert!(matches!(err, VotiveError::LayoutUnavailable(_)), "{err}");
}

#[test]
fn missing_file_is_layout_unavailable() {
    let err = ParleyFont::load("target/definitely/missing/font.ttf").unwrap_err();
    assert!(matches!(err, VotiveError::LayoutUnavailable(_)), "{err}");
}

#[test]
fn invalid_size_is_rejected_before_parsing() {
    let err = ParleyFont::from_bytes(Vec::new(), f32::NAN).unwrap_err();
    assert!(err.to_string().contains("size_px"));
}

#[test]
fn ink_pixels_are_translated_and_skip_zero_coverage() {
    let mask = InkMask {
        x: 10,
        y: -1,
        width: 2,
        height: 2,
        coverage: vec![0, 255, 7, 0],
    };
    let px: Vec<_> = mask.ink_pixels().collect();
    assert_eq!(px, vec![(11, -1, 255), (10, 0, 7)]);
    assert!(!mask.is_empty());
    assert!(InkMask::empty().is_empty());
}

#[test]
fn parley_font_measures_monotonically() {
    let Some(bytes) = test_font_bytes() else {
        eprintln!("no test font available; skipping");
        return;
    };
    let font = ParleyFont::from_bytes(bytes, FONT_SIZE_PX).unwrap();
    assert!(!font.family().is_empty());

    assert_eq!(font.measure(""), 0.0);
    let one = font.measure("candle");
    let two = font.measure("candle light");
    assert!(one > 0.0);
    assert!(two > one);
    assert_eq!(font.measure("candle light"), two);
}

#[test]
fn parley_font_draws_ink_near_baseline() {
    let Some(bytes) = test_font_bytes() else {
        eprintln!("no test font available; skipping");
        return;
    };
    let font = ParleyFont::from_bytes(bytes, FONT_SIZE_PX).unwrap();

    let mask = font.draw("Hello", Point::new(20.0, 30.0));
    assert!(!mask.is_empty());
    assert_eq!(mask.coverage.len(), (mask.width * mask.height) as usize);

    let (min_y, max_y) = mask
        .ink_pixels()
        .fold((i32::MAX, i32::MIN), |(lo, hi), (_, y, _)| (lo.min(y), hi.max(y)));
    // Cap height of a 12px face sits well within a line above the baseline.
    assert!(min_y >= 30 - 14, "min_y={min_y}");
    assert!(max_y <= 30 + 4, "max_y={max_y}");

    assert_eq!(font.draw("Hello", Point::new(20.0, 30.0)), mask);
    assert!(font.draw("   ", Point::new(0.0, 0.0)).is_empty());
}

#[test]
fn font_bytes_are_shared_and_registered_once_per_thread() {
    let Some(bytes) = test_font_bytes() else {
        eprintln!("no test font available; skipping");
        return;
    };
    let font = ParleyFont::from_bytes(bytes, FONT_SIZE_PX).unwrap();
    assert_eq!(font.size_px(), FONT_SIZE_PX);

    // One allocation backs the struct, the Parley blob and the vello_cpu font handle.
    assert!(Arc::strong_count(&font.font_bytes) >= 3);
    let copy = font.clone();
    assert!(Arc::ptr_eq(&font.font_bytes, &copy.font_bytes));

    // Loading registered the font on this thread; shaping reuses that registration.
    assert_eq!(cached_shaper_count(), 1);
    let width = font.measure("light a candle");
    for word in ["light", "a", "candle", "light a", "a candle"] {
        let _ = font.measure(word);
    }
    let _ = font.draw("light a candle", Point::new(8.0, 16.0));
    assert_eq!(copy.measure("light a candle"), width);
    assert_eq!(cached_shaper_count(), 1);

    let worker = std::thread::spawn(move || {
        let before = cached_shaper_count();
        let w = copy.measure("light a candle");
        (before, cached_shaper_count(), w)
    });
    let (before, after, worker_width) = worker.join().unwrap();
    assert_eq!((before, after), (0, 1));
    assert_eq!(worker_width, width);
}

#[test]
fn shaper_cache_is_bounded_per_thread() {
    let Some(bytes) = test_font_bytes() else {
        eprintln!("no test font available; skipping");
        return;
    };
    let fonts: Vec<_> = (0..MAX_CACHED_SHAPERS + 2)
        .map(|_| ParleyFont::from_bytes(bytes.clone(), FONT_SIZE_PX).unwrap())
        .collect();
    for font in &fonts {
        assert!(font.measure("ember") > 0.0);
    }
    assert!(cached_shaper_count() <= MAX_CACHED_SHAPERS);
}

mod bench;

/// Reinterprets the front of `slice` as a fixed-size array.
///
/// # Safety
/// `slice.len()` must be at least `N`.
#[inline(always)]
pub(crate) const unsafe fn slice_to_array<T, const N: usize>(slice: &[T]) -> &[T; N] {
    &*(slice.as_ptr() as *const [T; N])
}

/// Converts a size in bytes to a human-readable string. For benchmarking
pub fn human_readable_size(size: usize) -> String {
    const UNITS: [&str; 9] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB", "ZiB", "YiB"];

    let mut cal_size = size;
    let mut unit = 0;
    while cal_size >= 1024 && cal_size % 1024 == 0 && unit + 1 < UNITS.len() {
        cal_size >>= 10;
        unit += 1;
    }
    format!("{} {}", cal_size, UNITS[unit])
}

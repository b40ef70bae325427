use super::K64;

cfg_if::cfg_if! {
    if #[cfg(feature = "compact")] {
        pub(crate) use self::compress_rolled as compress;
    } else {
        pub(crate) use self::compress_unrolled as compress;
    }
}

#[inline(always)]
fn load_words(block: &[u8; 64]) -> [u32; 16] {
    let mut w = [0u32; 16];
    for (i, word) in w.iter_mut().enumerate() {
        *word = u32::from_le_bytes([
            block[i * 4],
            block[i * 4 + 1],
            block[i * 4 + 2],
            block[i * 4 + 3],
        ]);
    }
    w
}

#[inline(always)]
fn f(x: u32, y: u32, z: u32) -> u32 {
    // bitwise select: y where x is set, z elsewhere
    (x & y) | (!x & z)
}

#[inline(always)]
fn g(x: u32, y: u32, z: u32) -> u32 {
    (x & z) | (y & !z)
}

#[inline(always)]
fn h(x: u32, y: u32, z: u32) -> u32 {
    x ^ y ^ z
}

#[inline(always)]
fn i(x: u32, y: u32, z: u32) -> u32 {
    y ^ (x | !z)
}

/// One MD5 step. `s` is always a literal at the call site so the rotation
/// folds into a single instruction.
#[inline(always)]
fn step(mix: u32, a: u32, b: u32, x: u32, k: u32, s: u32) -> u32 {
    a.wrapping_add(mix)
        .wrapping_add(x)
        .wrapping_add(k)
        .rotate_left(s)
        .wrapping_add(b)
}

#[cfg(any(test, not(feature = "compact")))]
pub(crate) fn compress_unrolled(state: &mut [u32; 4], block: &[u8; 64]) {
    let w = load_words(block);

    let mut a = state[0];
    let mut b = state[1];
    let mut c = state[2];
    let mut d = state[3];

    #[crate::loop_unroll(j, 0, 4, 4)]
    fn loop_unroll() {
        a = step(f(b, c, d), a, b, w[j], K64[j], 7);
        d = step(f(a, b, c), d, a, w[j + 1], K64[j + 1], 12);
        c = step(f(d, a, b), c, d, w[j + 2], K64[j + 2], 17);
        b = step(f(c, d, a), b, c, w[j + 3], K64[j + 3], 22);
    }

    #[crate::loop_unroll(j, 16, 4, 4)]
    fn loop_unroll() {
        a = step(g(b, c, d), a, b, w[(5 * j + 1) % 16], K64[j], 5);
        d = step(g(a, b, c), d, a, w[(5 * j + 6) % 16], K64[j + 1], 9);
        c = step(g(d, a, b), c, d, w[(5 * j + 11) % 16], K64[j + 2], 14);
        b = step(g(c, d, a), b, c, w[(5 * j + 16) % 16], K64[j + 3], 20);
    }

    #[crate::loop_unroll(j, 32, 4, 4)]
    fn loop_unroll() {
        a = step(h(b, c, d), a, b, w[(3 * j + 5) % 16], K64[j], 4);
        d = step(h(a, b, c), d, a, w[(3 * j + 8) % 16], K64[j + 1], 11);
        c = step(h(d, a, b), c, d, w[(3 * j + 11) % 16], K64[j + 2], 16);
        b = step(h(c, d, a), b, c, w[(3 * j + 14) % 16], K64[j + 3], 23);
    }

    #[crate::loop_unroll(j, 48, 4, 4)]
    fn loop_unroll() {
        a = step(i(b, c, d), a, b, w[(7 * j) % 16], K64[j], 6);
        d = step(i(a, b, c), d, a, w[(7 * j + 7) % 16], K64[j + 1], 10);
        c = step(i(d, a, b), c, d, w[(7 * j + 14) % 16], K64[j + 2], 15);
        b = step(i(c, d, a), b, c, w[(7 * j + 21) % 16], K64[j + 3], 21);
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
}

#[cfg(any(test, feature = "compact"))]
const SHIFTS: [[u32; 4]; 4] = [[7, 12, 17, 22], [5, 9, 14, 20], [4, 11, 16, 23], [6, 10, 15, 21]];

#[cfg(any(test, feature = "compact"))]
pub(crate) fn compress_rolled(state: &mut [u32; 4], block: &[u8; 64]) {
    let w = load_words(block);
    let [mut a, mut b, mut c, mut d] = *state;

    for n in 0..64 {
        let (mix, x) = match n / 16 {
            0 => (f(b, c, d), w[n]),
            1 => (g(b, c, d), w[(5 * n + 1) % 16]),
            2 => (h(b, c, d), w[(3 * n + 5) % 16]),
            _ => (i(b, c, d), w[(7 * n) % 16]),
        };
        let next = step(mix, a, b, x, K64[n], SHIFTS[n / 16][n % 4]);
        a = d;
        d = c;
        c = b;
        b = next;
    }

    state[0] = state[0].wrapping_add(a);
    state[1] = state[1].wrapping_add(b);
    state[2] = state[2].wrapping_add(c);
    state[3] = state[3].wrapping_add(d);
}

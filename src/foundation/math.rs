#[derive(Clone, Copy, Debug)]
pub(crate) struct Fnv1a64(u64);

impl Fnv1a64 {
    pub(crate) const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01B3;

    pub(crate) fn new_default() -> Self {
        Self(Self::OFFSET_BASIS)
    }

    pub(crate) fn write_bytes(&mut self, bytes: &[u8]) {
        let mut h = self.0;
        for &b in bytes {
            h ^= u64::from(b);
            h = h.wrapping_mul(Self::PRIME);
        }
        self.0 = h;
    }

    pub(crate) fn finish(self) -> u64 {
        self.0
    }
}

/// Stable 64-bit seed for a label (style names seed the wood grain).
pub(crate) fn seed_for(label: &str) -> u64 {
    let mut h = Fnv1a64::new_default();
    h.write_bytes(label.as_bytes());
    h.finish()
}

pub(crate) fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Hash lattice value in `[0, 1)`.
pub(crate) fn lattice(seed: u64, i: i64) -> f32 {
    let h = mix64(seed ^ (i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
    ((h >> 40) as f32) / ((1u64 << 24) as f32)
}

/// Smooth 1-D value noise in `[0, 1)`.
pub(crate) fn value_noise(seed: u64, x: f32) -> f32 {
    let i = x.floor();
    let t = x - i;
    let a = lattice(seed, i as i64);
    let b = lattice(seed, i as i64 + 1);
    let s = t * t * (3.0 - 2.0 * t);
    a + (b - a) * s
}

pub(crate) fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

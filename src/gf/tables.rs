use crate::error::TabgenError;

/// Candidate degree-8 reduction polynomials, each stored without the implicit
/// x^8 term and constant bit: entry `g` encodes x^8 + (g << 1 | 1).
pub const POLYNOMIAL_CATALOG: [u8; 16] = [
    0x8e, 0x95, 0x96, 0xa6, 0xaf, 0xb1, 0xb2, 0xb4, 0xb8, 0xc3, 0xc6, 0xd4, 0xe1, 0xe7, 0xf3, 0xfa,
];

/// Catalog index of 0xC3. Its first 20 min-weight elements average 16.5 ones;
/// the polynomial Jerasure uses averages 17.55.
pub const DEFAULT_POLY_INDEX: usize = 9;

/// Stored in `log[0]`; 0 has no discrete logarithm. The sentinel points into
/// the zero-padded tail of `exp`, so a lookup through it still reads 0.
pub const LOG_ZERO: u16 = 512;

const EXP_LEN: usize = 4 * 255 + 1;

/// Read-only GF(256) arithmetic tables built once from a primitive reduction
/// polynomial and shared by reference with every other component.
pub struct GfTables {
    log: [u16; 256],
    exp: [u8; EXP_LEN],
    mul: Box<[[u8; 256]; 256]>,
    div: Box<[[u8; 256]; 256]>,
    inv: [u8; 256],
}

impl GfTables {
    pub fn build(poly_index: usize) -> Result<Self, TabgenError> {
        let generator = *POLYNOMIAL_CATALOG.get(poly_index).ok_or(
            TabgenError::PolynomialIndexOutOfRange(poly_index, POLYNOMIAL_CATALOG.len()),
        )?;
        Self::from_polynomial(generator)
    }

    pub fn from_polynomial(generator: u8) -> Result<Self, TabgenError> {
        let poly = ((generator as u32) << 1) | 1;

        let mut log = [0u16; 256];
        let mut exp = [0u8; EXP_LEN];
        log[0] = LOG_ZERO;
        exp[0] = 1;
        for j in 1..255 {
            let mut next = (exp[j - 1] as u32) << 1;
            if next >= 256 {
                next ^= poly;
            }
            exp[j] = next as u8;
            log[next as usize] = j as u16;
        }

        // A primitive polynomial visits every nonzero byte exactly once in
        // the first 255 doublings; anything less would make the mul/div
        // tables silently wrong.
        let mut seen = [false; 256];
        let mut distinct = 0usize;
        for &v in &exp[..255] {
            if v != 0 && !seen[v as usize] {
                seen[v as usize] = true;
                distinct += 1;
            }
        }
        if distinct != 255 {
            return Err(TabgenError::NonPrimitivePolynomial(generator, distinct));
        }

        // Wrap the 255-cycle so that sums of two logs (max 508) and lookups
        // through the log(0) sentinel need no modulo branching.
        for j in 255..2 * 255 {
            exp[j] = exp[j - 255];
        }
        exp[2 * 255] = 1;

        let mut mul = Box::new([[0u8; 256]; 256]);
        let mut div = Box::new([[0u8; 256]; 256]);
        // y = 0 subtables stay all zero: 0 is absorbing for multiply, and
        // division by 0 is rejected at the accessor.
        for y in 1..256 {
            let log_y = log[y] as usize;
            let log_yn = 255 - log_y;
            for x in 1..256 {
                let log_x = log[x] as usize;
                mul[y][x] = exp[log_x + log_y];
                div[y][x] = exp[log_x + log_yn];
            }
        }

        let mut inv = [0u8; 256];
        for x in 1..256 {
            inv[x] = div[x][1];
        }

        Ok(GfTables {
            log,
            exp,
            mul,
            div,
            inv,
        })
    }

    /// x * y. For repeated multiplication by a constant put the constant in `y`.
    #[inline]
    pub fn mul(&self, x: u8, y: u8) -> u8 {
        self.mul[y as usize][x as usize]
    }

    /// x / y. A zero divisor is a caller bug, not a field operation.
    #[inline]
    pub fn div(&self, x: u8, y: u8) -> u8 {
        debug_assert_ne!(y, 0, "division by zero in GF(256)");
        self.div[y as usize][x as usize]
    }

    /// 1 / x for x != 0.
    #[inline]
    pub fn inv(&self, x: u8) -> u8 {
        debug_assert_ne!(x, 0, "zero has no multiplicative inverse");
        self.inv[x as usize]
    }
}

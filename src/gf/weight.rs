use crate::cauchy::sort::selection_sort_paired;
use crate::gf::tables::GfTables;

/// Ones-count of every field value acting as a multiplier.
///
/// Column w of a value's 8x8 binary companion matrix is the value multiplied
/// by 2 w times, so the total set bits in the expansion is the popcount of
/// the 8-step doubling orbit. That total is proportional to the XOR work a
/// bit-sliced encoder spends on the multiplier.
#[derive(Debug, Clone)]
pub struct WeightTable {
    ones: [u8; 256],
}

impl WeightTable {
    pub fn build(gf: &GfTables) -> Self {
        let mut ones = [0u8; 256];
        for (v, slot) in ones.iter_mut().enumerate() {
            *slot = companion_ones(gf, v as u8);
        }
        WeightTable { ones }
    }

    #[inline]
    pub fn ones(&self, v: u8) -> u32 {
        self.ones[v as usize] as u32
    }

    /// The 256 field values ordered ascending by weight ("min-weight order").
    /// The greedy solver scans candidates in this order so the first feasible
    /// hit is also the cheapest.
    pub fn min_weight_order(&self) -> [u8; 256] {
        let mut order = [0u8; 256];
        for (i, slot) in order.iter_mut().enumerate() {
            *slot = i as u8;
        }
        let mut counts: Vec<u32> = order.iter().map(|&v| self.ones(v)).collect();
        selection_sort_paired(&mut counts, |a, b| order.swap(a, b));
        order
    }
}

fn companion_ones(gf: &GfTables, v: u8) -> u8 {
    let mut ones = 0u32;
    let mut cur = v;
    for _ in 0..8 {
        ones += cur.count_ones();
        cur = gf.mul(cur, 2);
    }
    ones as u8
}

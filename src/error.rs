use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TabgenError {
    #[error("polynomial index {0} is out of range (catalog has {1} entries)")]
    PolynomialIndexOutOfRange(usize, usize),

    #[error(
        "polynomial 0x{0:02x} is not primitive: doubling visits {1} of 255 nonzero field values"
    )]
    NonPrimitivePolynomial(u8, usize),

    #[error("invalid dimensions k={k}, m={m}: need k >= 1, m >= 1 and k + m <= 256")]
    InvalidDimensions { k: usize, m: usize },

    #[error("seed values A={0} and F={1} must be distinct")]
    SeedCollision(u8, u8),

    #[error("seed pair A={0} F={1} is infeasible: every candidate multiplier maps to a used value")]
    InfeasibleSeed(u8, u8),

    #[error("vector elements must be distinct across X and Y: 0x{0:02x} repeats")]
    OverlappingVectors(u8),
}

/// Frequency in megahertz.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct MegaHertz(pub f64);

impl std::fmt::Display for MegaHertz {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl MegaHertz {
    pub const fn as_mhz(self) -> f64 {
        self.0
    }
}

impl From<f64> for MegaHertz {
    fn from(mhz: f64) -> Self {
        Self(mhz)
    }
}

impl From<MegaHertz> for f64 {
    fn from(mhz: MegaHertz) -> Self {
        mhz.0
    }
}

/// Level in Decibels (dB).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Decibels(pub f32);

impl std::fmt::Display for Decibels {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Decibels {
    /// Convert a power ratio to decibels.
    /// For power: dB = 10 * log10(power)
    pub fn from_power(power: f32) -> Self {
        Self(10.0 * power.max(f32::MIN_POSITIVE).log10())
    }

    pub const fn as_db(self) -> f32 {
        self.0
    }
}

impl From<f32> for Decibels {
    fn from(db: f32) -> Self {
        Self(db)
    }
}

impl From<Decibels> for f32 {
    fn from(db: Decibels) -> Self {
        db.0
    }
}

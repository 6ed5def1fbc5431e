//! Quality flag vocabularies for bitmask variables.
//!
//! Level-2 ocean color products carry an integer bitmask variable where each
//! bit position marks a per-pixel condition (cloud, land, glint, ...). The
//! flag vocabulary is resolved into a closed set of named bit constants at
//! configuration time so typos surface before any pixel is processed.

use serde::{Deserialize, Serialize};

use crate::error::CommonError;

/// One named flag: a symbolic name bound to a bit mask.
///
/// A pixel "has" the flag when `(bitmask & mask) != 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityFlag {
    pub name: String,
    pub mask: u32,
}

impl QualityFlag {
    /// Create a flag occupying a single bit position.
    pub fn bit(name: &str, position: u8) -> Self {
        Self {
            name: name.to_string(),
            mask: 1 << position,
        }
    }
}

/// A closed vocabulary of named quality flags.
///
/// Flag masks must be pairwise distinct; bits in the data that no flag names
/// are ignored, not errors (newer products may define bits an older
/// vocabulary does not know about).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityFlagSet {
    flags: Vec<QualityFlag>,
}

impl QualityFlagSet {
    /// Build a flag set, validating name and mask uniqueness.
    pub fn new(flags: Vec<QualityFlag>) -> Result<Self, CommonError> {
        for (i, flag) in flags.iter().enumerate() {
            if flag.mask == 0 {
                return Err(CommonError::InvalidFlagSet(format!(
                    "flag '{}' has an empty bit mask",
                    flag.name
                )));
            }
            for other in &flags[i + 1..] {
                if flag.name == other.name {
                    return Err(CommonError::InvalidFlagSet(format!(
                        "duplicate flag name '{}'",
                        flag.name
                    )));
                }
                if flag.mask == other.mask {
                    return Err(CommonError::InvalidFlagSet(format!(
                        "flags '{}' and '{}' share bit mask {:#x}",
                        flag.name, other.name, flag.mask
                    )));
                }
            }
        }

        Ok(Self { flags })
    }

    /// The standard ocean color Level-2 `l2_flags` vocabulary.
    ///
    /// Bit positions follow the NASA Ocean Biology processing convention;
    /// spare bits are omitted.
    pub fn ocean_color_l2() -> Self {
        let flags = vec![
            QualityFlag::bit("ATMFAIL", 0),
            QualityFlag::bit("LAND", 1),
            QualityFlag::bit("PRODWARN", 2),
            QualityFlag::bit("HIGLINT", 3),
            QualityFlag::bit("HILT", 4),
            QualityFlag::bit("HISATZEN", 5),
            QualityFlag::bit("COASTZ", 6),
            QualityFlag::bit("STRAYLIGHT", 8),
            QualityFlag::bit("CLDICE", 9),
            QualityFlag::bit("COCCOLITH", 10),
            QualityFlag::bit("TURBIDW", 11),
            QualityFlag::bit("HISOLZEN", 12),
            QualityFlag::bit("LOWLW", 14),
            QualityFlag::bit("CHLFAIL", 15),
            QualityFlag::bit("NAVWARN", 16),
            QualityFlag::bit("ABSAER", 17),
            QualityFlag::bit("MAXAERITER", 19),
            QualityFlag::bit("MODGLINT", 20),
            QualityFlag::bit("CHLWARN", 21),
            QualityFlag::bit("ATMWARN", 22),
            QualityFlag::bit("SEAICE", 24),
            QualityFlag::bit("NAVFAIL", 25),
            QualityFlag::bit("FILTER", 26),
            QualityFlag::bit("BOWTIEDEL", 28),
            QualityFlag::bit("HIPOL", 29),
            QualityFlag::bit("PRODFAIL", 30),
        ];

        // Uniqueness holds by construction for the builtin vocabulary.
        Self { flags }
    }

    /// Look up the bit mask for a flag name.
    pub fn mask_for(&self, name: &str) -> Result<u32, CommonError> {
        self.flags
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.mask)
            .ok_or_else(|| CommonError::UnknownFlag(name.to_string()))
    }

    /// OR together the masks of several flag names, failing fast on the
    /// first unknown name.
    pub fn combined_mask<'a, I>(&self, names: I) -> Result<u32, CommonError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut combined = 0u32;
        for name in names {
            combined |= self.mask_for(name)?;
        }
        Ok(combined)
    }

    /// All flag names in this vocabulary.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(|f| f.name.as_str())
    }

    /// Number of flags in the vocabulary.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Check if the vocabulary is empty.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

//! # Resource Types
//!
//! Numeric type codes from the resource table, with the file extensions
//! the toolset uses for them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The type of a resource stored in an archive.
///
/// This is a thin wrapper around the raw 32-bit value from the resource
/// table. The archive reader never validates it: values without a named
/// constant are carried through untouched and show up as their number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileType(pub u32);

/// Named types and their canonical file extensions.
const KNOWN: &[(FileType, &str)] = &[
    (FileType::RES, "res"),
    (FileType::BMP, "bmp"),
    (FileType::MVE, "mve"),
    (FileType::TGA, "tga"),
    (FileType::WAV, "wav"),
    (FileType::PLT, "plt"),
    (FileType::INI, "ini"),
    (FileType::TXT, "txt"),
    (FileType::MDL, "mdl"),
    (FileType::NSS, "nss"),
    (FileType::NCS, "ncs"),
    (FileType::ARE, "are"),
    (FileType::SET, "set"),
    (FileType::IFO, "ifo"),
    (FileType::BIC, "bic"),
    (FileType::WOK, "wok"),
    (FileType::TWO_DA, "2da"),
    (FileType::TXI, "txi"),
    (FileType::GIT, "git"),
    (FileType::UTI, "uti"),
    (FileType::UTC, "utc"),
    (FileType::DLG, "dlg"),
    (FileType::ITP, "itp"),
    (FileType::UTT, "utt"),
    (FileType::DDS, "dds"),
    (FileType::UTS, "uts"),
    (FileType::LTR, "ltr"),
    (FileType::GFF, "gff"),
    (FileType::FAC, "fac"),
    (FileType::UTE, "ute"),
    (FileType::UTD, "utd"),
    (FileType::UTP, "utp"),
    (FileType::DFT, "dft"),
    (FileType::GIC, "gic"),
    (FileType::GUI, "gui"),
    (FileType::UTM, "utm"),
    (FileType::DWK, "dwk"),
    (FileType::PWK, "pwk"),
    (FileType::JRL, "jrl"),
    (FileType::UTW, "utw"),
    (FileType::SSF, "ssf"),
    (FileType::NDB, "ndb"),
    (FileType::PTM, "ptm"),
    (FileType::PTT, "ptt"),
];

impl FileType {
    pub const RES: Self = Self(0);
    pub const BMP: Self = Self(1);
    pub const MVE: Self = Self(2);
    pub const TGA: Self = Self(3);
    pub const WAV: Self = Self(4);
    pub const PLT: Self = Self(6);
    pub const INI: Self = Self(7);
    pub const TXT: Self = Self(10);
    pub const MDL: Self = Self(2002);
    pub const NSS: Self = Self(2009);
    pub const NCS: Self = Self(2010);
    pub const ARE: Self = Self(2012);
    pub const SET: Self = Self(2013);
    pub const IFO: Self = Self(2014);
    pub const BIC: Self = Self(2015);
    pub const WOK: Self = Self(2016);
    pub const TWO_DA: Self = Self(2017);
    pub const TXI: Self = Self(2022);
    pub const GIT: Self = Self(2023);
    pub const UTI: Self = Self(2025);
    pub const UTC: Self = Self(2027);
    pub const DLG: Self = Self(2029);
    pub const ITP: Self = Self(2030);
    pub const UTT: Self = Self(2032);
    pub const DDS: Self = Self(2033);
    pub const UTS: Self = Self(2035);
    pub const LTR: Self = Self(2036);
    pub const GFF: Self = Self(2037);
    pub const FAC: Self = Self(2038);
    pub const UTE: Self = Self(2040);
    pub const UTD: Self = Self(2042);
    pub const UTP: Self = Self(2044);
    pub const DFT: Self = Self(2045);
    pub const GIC: Self = Self(2046);
    pub const GUI: Self = Self(2047);
    pub const UTM: Self = Self(2051);
    pub const DWK: Self = Self(2052);
    pub const PWK: Self = Self(2053);
    pub const JRL: Self = Self(2056);
    pub const UTW: Self = Self(2058);
    pub const SSF: Self = Self(2060);
    pub const NDB: Self = Self(2064);
    pub const PTM: Self = Self(2065);
    pub const PTT: Self = Self(2066);

    /// The raw value as stored in the archive.
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Canonical extension (without the dot), if this is a known type.
    pub fn extension(self) -> Option<&'static str> {
        KNOWN
            .iter()
            .find(|(ty, _)| *ty == self)
            .map(|(_, ext)| *ext)
    }

    /// Look up a type by extension. Case-insensitive, leading dot optional.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        KNOWN
            .iter()
            .find(|(_, known)| known.eq_ignore_ascii_case(ext))
            .map(|(ty, _)| *ty)
    }

    /// Whether this value has a named constant.
    pub fn is_known(self) -> bool {
        self.extension().is_some()
    }
}

impl From<u32> for FileType {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.extension() {
            Some(ext) => write!(f, "FileType({}:{ext})", self.0),
            None => write!(f, "FileType({})", self.0),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.extension() {
            Some(ext) => f.write_str(ext),
            None => write!(f, "{}", self.0),
        }
    }
}

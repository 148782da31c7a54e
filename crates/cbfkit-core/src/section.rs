//! Section keywords

use std::fmt;

/// One of the fifteen keywords that open a section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Ver,
    ObjSense,
    PsdVar,
    Var,
    Int,
    Con,
    PsdCon,
    ObjFCoord,
    ObjACoord,
    ObjBCoord,
    FCoord,
    ACoord,
    BCoord,
    HCoord,
    DCoord,
}

impl Section {
    /// Sections in the order the writer emits them
    pub const ALL: [Section; 15] = [
        Section::Ver,
        Section::ObjSense,
        Section::PsdVar,
        Section::Var,
        Section::Int,
        Section::Con,
        Section::PsdCon,
        Section::ObjFCoord,
        Section::ObjACoord,
        Section::ObjBCoord,
        Section::FCoord,
        Section::ACoord,
        Section::BCoord,
        Section::HCoord,
        Section::DCoord,
    ];

    /// Match a keyword exactly (keywords are case-sensitive)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.keyword() == keyword)
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Section::Ver => "VER",
            Section::ObjSense => "OBJSENSE",
            Section::PsdVar => "PSDVAR",
            Section::Var => "VAR",
            Section::Int => "INT",
            Section::Con => "CON",
            Section::PsdCon => "PSDCON",
            Section::ObjFCoord => "OBJFCOORD",
            Section::ObjACoord => "OBJACOORD",
            Section::ObjBCoord => "OBJBCOORD",
            Section::FCoord => "FCOORD",
            Section::ACoord => "ACOORD",
            Section::BCoord => "BCOORD",
            Section::HCoord => "HCOORD",
            Section::DCoord => "DCOORD",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_roundtrip() {
        for section in Section::ALL {
            assert_eq!(Section::from_keyword(section.keyword()), Some(section));
        }
    }

    #[test]
    fn test_keywords_case_sensitive() {
        assert_eq!(Section::from_keyword("ver"), None);
        assert_eq!(Section::from_keyword("Acoord"), None);
        assert_eq!(Section::from_keyword("POWCONES"), None);
    }
}

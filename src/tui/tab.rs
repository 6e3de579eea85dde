/// The three dashboard tabs, in strip order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Searchable staff table
    #[default]
    Biodata,
    /// Grade and specialization charts
    Infografik,
    /// External registration form
    TambahGuru,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Biodata, Tab::Infografik, Tab::TambahGuru];

    /// Cycle to the next tab
    pub fn cycle(&self) -> Self {
        match self {
            Self::Biodata => Self::Infografik,
            Self::Infografik => Self::TambahGuru,
            Self::TambahGuru => Self::Biodata,
        }
    }

    /// Cycle to the previous tab
    pub fn cycle_reverse(&self) -> Self {
        match self {
            Self::Biodata => Self::TambahGuru,
            Self::TambahGuru => Self::Infografik,
            Self::Infografik => Self::Biodata,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Biodata => "Biodata",
            Self::Infografik => "Infografik",
            Self::TambahGuru => "Tambah Guru",
        }
    }

    /// Position in the tab strip
    pub fn index(&self) -> usize {
        match self {
            Self::Biodata => 0,
            Self::Infografik => 1,
            Self::TambahGuru => 2,
        }
    }

    /// Digit shortcut: '1' is the first tab
    pub fn from_digit(c: char) -> Option<Self> {
        c.to_digit(10)
            .and_then(|d| (d as usize).checked_sub(1))
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Key hints shown in the footer
    pub fn keyboard_hint(&self) -> &str {
        match self {
            Self::Biodata => {
                "/ cari  g/G gred  s/S pengkhususan  p baris  x set semula  ←/→ halaman  ↑/↓ pilih  Enter butiran"
            }
            Self::Infografik => "g/G fokus gred",
            Self::TambahGuru => "buka pautan borang dalam pelayar web",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tab_cycling() {
        let mut tab = Tab::Biodata;

        tab = tab.cycle();
        assert_eq!(tab, Tab::Infografik);

        tab = tab.cycle();
        assert_eq!(tab, Tab::TambahGuru);

        tab = tab.cycle();
        assert_eq!(tab, Tab::Biodata);
    }

    #[test]
    fn test_tab_cycling_reverse() {
        let mut tab = Tab::Biodata;

        tab = tab.cycle_reverse();
        assert_eq!(tab, Tab::TambahGuru);

        tab = tab.cycle_reverse();
        assert_eq!(tab, Tab::Infografik);

        tab = tab.cycle_reverse();
        assert_eq!(tab, Tab::Biodata);
    }

    #[test]
    fn test_from_digit() {
        assert_eq!(Tab::from_digit('1'), Some(Tab::Biodata));
        assert_eq!(Tab::from_digit('3'), Some(Tab::TambahGuru));
        assert_eq!(Tab::from_digit('0'), None);
        assert_eq!(Tab::from_digit('4'), None);
        assert_eq!(Tab::from_digit('x'), None);
    }

    #[test]
    fn test_index_matches_strip_order() {
        for (i, tab) in Tab::ALL.iter().enumerate() {
            assert_eq!(tab.index(), i);
        }
    }
}

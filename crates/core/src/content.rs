//! Static item catalogs: the five weapons and three talismans.

use crate::types::{TalismanKind, WeaponKind};

pub struct WeaponInfo {
    pub kind: WeaponKind,
    pub name: &'static str,
    pub symbol: &'static str,
    /// The mace is in the pack from the first turn.
    pub starts_owned: bool,
}

pub fn weapon_info(kind: WeaponKind) -> WeaponInfo {
    match kind {
        WeaponKind::Mace => {
            WeaponInfo { kind, name: "Mace", symbol: "\u{2692}", starts_owned: true }
        }
        WeaponKind::Dagger => {
            WeaponInfo { kind, name: "Dagger", symbol: "\u{2020}", starts_owned: false }
        }
        WeaponKind::Wand => {
            WeaponInfo { kind, name: "Magic Wand", symbol: "\u{269a}", starts_owned: false }
        }
        WeaponKind::Arrow => {
            WeaponInfo { kind, name: "Normal Arrow", symbol: "\u{27b3}", starts_owned: false }
        }
        WeaponKind::Sword => {
            WeaponInfo { kind, name: "Sword", symbol: "\u{2694}", starts_owned: false }
        }
    }
}

pub struct TalismanInfo {
    pub kind: TalismanKind,
    pub name: &'static str,
    pub health_bonus: i32,
    pub strength_bonus: i32,
}

pub fn talisman_info(kind: TalismanKind) -> TalismanInfo {
    match kind {
        TalismanKind::Health => {
            TalismanInfo { kind, name: "Health Talisman", health_bonus: 10, strength_bonus: 0 }
        }
        TalismanKind::Damage => {
            TalismanInfo { kind, name: "Damage Talisman", health_bonus: 0, strength_bonus: 5 }
        }
        TalismanKind::Speed => {
            TalismanInfo { kind, name: "Speed Talisman", health_bonus: 0, strength_bonus: 0 }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TALISMAN_KINDS, WEAPON_KINDS};

    #[test]
    fn only_the_mace_starts_owned() {
        let owned: Vec<_> =
            WEAPON_KINDS.iter().filter(|kind| weapon_info(**kind).starts_owned).collect();
        assert_eq!(owned, vec![&WeaponKind::Mace]);
    }

    #[test]
    fn talisman_bonuses_match_their_kinds() {
        for kind in TALISMAN_KINDS {
            let info = talisman_info(kind);
            match kind {
                TalismanKind::Health => assert_eq!(info.health_bonus, 10),
                TalismanKind::Damage => assert_eq!(info.strength_bonus, 5),
                TalismanKind::Speed => {
                    assert_eq!(info.health_bonus, 0);
                    assert_eq!(info.strength_bonus, 0);
                }
            }
        }
    }
}

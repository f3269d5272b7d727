//! Pickup and consumption effects: talismans, food, weapon caches, eating.
//! It does not own movement validation or the confirm-key dispatch order.

use super::Game;
use crate::content;
use crate::levelgen::rand_below;
use crate::types::{FOOD_CAP, LogEvent, Pos, TileKind, WeaponKind};

impl Game {
    /// Claim a talisman on the player's cell or any of its eight neighbors.
    /// The first successful claim wins and there is at most one per turn;
    /// already-owned talismans leave the pickup in place.
    pub(super) fn claim_talisman_near(&mut self) {
        let center = self.player;
        let mut targets = vec![center];
        for dy in -1..=1 {
            for dx in -1..=1 {
                if (dy, dx) != (0, 0) {
                    targets.push(center.offset(dy, dx));
                }
            }
        }

        for pos in targets {
            if self.level().grid.tile_at(pos) != TileKind::TalismanPickup {
                continue;
            }
            let kind = self.level().talisman;
            if self.talisman_owned(kind) {
                continue;
            }
            if let Some(state) = self.talismans.iter_mut().find(|state| state.kind == kind) {
                state.owned = true;
            }
            self.level_mut().grid.set_tile(pos, TileKind::Floor);

            let info = content::talisman_info(kind);
            self.stats.health += info.health_bonus;
            self.stats.strength += info.strength_bonus;
            let bonus_note = if info.health_bonus > 0 {
                format!(" +{} Health", info.health_bonus)
            } else if info.strength_bonus > 0 {
                format!(" +{} Strength", info.strength_bonus)
            } else {
                String::new()
            };
            self.set_message(format!("You obtained the {}!{}", info.name, bonus_note));
            self.push_log(LogEvent::TalismanClaimed { talisman: kind });
            return;
        }
    }

    /// Food on the player's cell, capped at five carried items.
    pub(super) fn pickup_food(&mut self) {
        if self.stats.food_count >= FOOD_CAP {
            self.set_message("You can't carry any more food!");
            return;
        }
        self.stats.food_count += 1;
        let pos = self.player;
        self.level_mut().grid.set_tile(pos, TileKind::Floor);
        self.set_message("You found some food!");
        self.push_log(LogEvent::FoodPickedUp);
    }

    /// A weapon cache grants a uniformly random weapon the player does not
    /// own yet. With a full armory the cache stays where it is.
    pub(super) fn pickup_weapon(&mut self) {
        let unowned: Vec<WeaponKind> = self
            .weapons
            .iter()
            .filter(|state| !state.owned)
            .map(|state| state.kind)
            .collect();
        if unowned.is_empty() {
            return;
        }
        let kind = unowned[rand_below(&mut self.rng, unowned.len() as i32) as usize];
        if let Some(state) = self.weapons.iter_mut().find(|state| state.kind == kind) {
            state.owned = true;
        }
        let pos = self.player;
        self.level_mut().grid.set_tile(pos, TileKind::Floor);
        self.set_message(format!("You found a {}!", content::weapon_info(kind).name));
        self.push_log(LogEvent::WeaponFound { weapon: kind });
    }

    /// Eat from the pack: +30 hunger capped at 100, +5 health capped at 20.
    pub fn eat_food(&mut self) {
        if self.stats.food_count == 0 {
            self.set_message("You don't have any food!");
            return;
        }
        self.stats.food_count -= 1;
        self.stats.hunger = (self.stats.hunger + 30).min(100);
        self.stats.health = (self.stats.health + 5).min(20);
        self.set_message("You eat some food. It was tasty!");
        self.push_log(LogEvent::FoodEaten);
    }

    /// Equip an owned weapon; the weapon menu maps digit keys onto this.
    pub fn equip_weapon(&mut self, kind: WeaponKind) -> bool {
        if !self.weapon_owned(kind) {
            self.set_message("You don't have this weapon yet!");
            return false;
        }
        self.current_weapon = kind;
        self.set_message(format!("Equipped {}", content::weapon_info(kind).name));
        true
    }

    pub(super) fn adjacent_secret_wall(&self, pos: Pos) -> Option<Pos> {
        for dy in -1..=1 {
            for dx in -1..=1 {
                let probe = pos.offset(dy, dx);
                if self.level().grid.cell(probe).secret_wall {
                    return Some(probe);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::fresh_game;
    use super::*;
    use crate::types::{TALISMAN_KINDS, TalismanKind};

    #[test]
    fn talisman_claim_applies_the_documented_stat_deltas() {
        for kind in TALISMAN_KINDS {
            let mut game = fresh_game(61);
            let pos = game.player;
            game.level_mut().grid.set_tile(pos, TileKind::TalismanPickup);
            game.level_mut().talisman = kind;
            let (health, strength) = (game.stats.health, game.stats.strength);

            game.claim_talisman_near();

            assert!(game.talisman_owned(kind));
            assert_eq!(game.level().grid.tile_at(pos), TileKind::Floor);
            match kind {
                TalismanKind::Health => {
                    assert_eq!(game.stats.health, health + 10);
                    assert_eq!(game.stats.strength, strength);
                }
                TalismanKind::Damage => {
                    assert_eq!(game.stats.health, health);
                    assert_eq!(game.stats.strength, strength + 5);
                }
                TalismanKind::Speed => {
                    assert_eq!(game.stats.health, health);
                    assert_eq!(game.stats.strength, strength);
                }
            }
        }
    }

    #[test]
    fn one_claim_per_turn_even_with_two_adjacent_pickups() {
        let mut game = fresh_game(62);
        let pos = game.player;
        game.level_mut().grid.set_tile(pos, TileKind::TalismanPickup);
        game.level_mut().grid.set_tile(pos.offset(0, 1), TileKind::TalismanPickup);
        game.level_mut().talisman = TalismanKind::Health;

        game.claim_talisman_near();

        // The second pickup survives; the owned type makes it inert.
        assert_eq!(game.level().grid.tile_at(pos), TileKind::Floor);
        assert_eq!(game.level().grid.tile_at(pos.offset(0, 1)), TileKind::TalismanPickup);
        assert_eq!(game.stats.health, 12 + 10);

        game.claim_talisman_near();
        assert_eq!(game.stats.health, 12 + 10, "an owned talisman must not re-apply");
    }

    #[test]
    fn owned_talisman_leaves_the_pickup_in_place() {
        let mut game = fresh_game(63);
        let pos = game.player;
        game.level_mut().grid.set_tile(pos, TileKind::TalismanPickup);
        game.level_mut().talisman = TalismanKind::Damage;
        game.claim_talisman_near();
        assert!(game.talisman_owned(TalismanKind::Damage));

        game.level_mut().grid.set_tile(pos, TileKind::TalismanPickup);
        game.claim_talisman_near();
        assert_eq!(game.level().grid.tile_at(pos), TileKind::TalismanPickup);
    }

    #[test]
    fn food_pickup_respects_the_carry_cap() {
        let mut game = fresh_game(64);
        let pos = game.player;
        for expected in 1..=FOOD_CAP {
            game.level_mut().grid.set_tile(pos, TileKind::Food);
            game.pickup_food();
            assert_eq!(game.stats.food_count, expected);
            assert_eq!(game.level().grid.tile_at(pos), TileKind::Floor);
        }
        game.level_mut().grid.set_tile(pos, TileKind::Food);
        game.pickup_food();
        assert_eq!(game.stats.food_count, FOOD_CAP);
        assert_eq!(game.level().grid.tile_at(pos), TileKind::Food, "cap leaves the food behind");
    }

    #[test]
    fn weapon_cache_grants_an_unowned_weapon() {
        let mut game = fresh_game(65);
        let pos = game.player;
        let owned_before: Vec<_> =
            game.weapons.iter().filter(|state| state.owned).map(|state| state.kind).collect();
        game.level_mut().grid.set_tile(pos, TileKind::WeaponCache);
        game.pickup_weapon();

        let owned_after: Vec<_> =
            game.weapons.iter().filter(|state| state.owned).map(|state| state.kind).collect();
        assert_eq!(owned_after.len(), owned_before.len() + 1);
        assert_eq!(game.level().grid.tile_at(pos), TileKind::Floor);
        let granted = owned_after.iter().find(|kind| !owned_before.contains(kind)).copied();
        assert!(granted.is_some());
        assert_ne!(granted, Some(WeaponKind::Mace));
    }

    #[test]
    fn full_armory_leaves_the_cache_untouched() {
        let mut game = fresh_game(66);
        for state in &mut game.weapons {
            state.owned = true;
        }
        let pos = game.player;
        game.level_mut().grid.set_tile(pos, TileKind::WeaponCache);
        game.pickup_weapon();
        assert_eq!(game.level().grid.tile_at(pos), TileKind::WeaponCache);
    }

    #[test]
    fn eating_caps_hunger_and_health() {
        let mut game = fresh_game(67);
        game.stats.food_count = 2;
        game.stats.hunger = 90;
        game.stats.health = 18;
        game.eat_food();
        assert_eq!(game.stats.hunger, 100);
        assert_eq!(game.stats.health, 20);
        assert_eq!(game.stats.food_count, 1);

        game.eat_food();
        game.eat_food();
        assert_eq!(game.stats.food_count, 0, "eating with an empty pack is refused");
    }

    #[test]
    fn equipping_requires_ownership() {
        let mut game = fresh_game(69);
        assert!(!game.equip_weapon(WeaponKind::Sword));
        assert_eq!(game.current_weapon, WeaponKind::Mace);

        if let Some(state) = game.weapons.iter_mut().find(|state| state.kind == WeaponKind::Sword) {
            state.owned = true;
        }
        assert!(game.equip_weapon(WeaponKind::Sword));
        assert_eq!(game.current_weapon, WeaponKind::Sword);
    }
}

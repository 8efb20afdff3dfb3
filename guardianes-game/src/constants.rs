//! Centralized bounds and tuning constants for the level simulators.
//!
//! The JSON tuning asset mirrors these values; the structs in
//! [`crate::data`] fall back to them when the asset cannot be parsed.

// Shared bounds ------------------------------------------------------------
pub const METER_MIN: u8 = 0;
pub const METER_MAX: u8 = 100;
pub const LEVEL_COUNT: u8 = 5;
pub const FIRST_LEVEL: u8 = 1;
pub const SCORE_MAX: u8 = 100;
pub const PLAYER_NAME_MAX_CHARS: usize = 30;

// Level 1: cleanup ---------------------------------------------------------
pub(crate) const CLEANUP_CONTAMINANTS: u8 = 3;
pub(crate) const CLEANUP_SCORE: u8 = 100;

// Level 2: planting --------------------------------------------------------
pub(crate) const PLANTING_PATCHES: usize = 24;
pub(crate) const PLANTING_FERTILIZER: u8 = 10;
pub(crate) const PLANTING_TARGET: u8 = 12;

// Level 3: husbandry -------------------------------------------------------
pub(crate) const HUSBANDRY_START_WATER: u8 = 45;
pub(crate) const HUSBANDRY_START_SUN: u8 = 80;
pub(crate) const HUSBANDRY_START_NUTRIENTS: u8 = 55;
pub(crate) const HUSBANDRY_START_HEALTH: u8 = 100;
pub(crate) const HUSBANDRY_WATER_BOOST: i32 = 25;
pub(crate) const HUSBANDRY_NUTRIENT_BOOST: i32 = 20;
pub(crate) const HUSBANDRY_SUN_BOOST: i32 = 15;
pub(crate) const HUSBANDRY_WATER_DECAY: i32 = 8;
pub(crate) const HUSBANDRY_SUN_DECAY: i32 = 5;
pub(crate) const HUSBANDRY_NUTRIENT_DECAY: i32 = 3;
pub(crate) const HUSBANDRY_HOT_CHANCE_PCT: u8 = 20;
pub(crate) const HUSBANDRY_OVERWATER_THRESHOLD: u8 = 70;
pub(crate) const HUSBANDRY_OVERWATER_PENALTY: i32 = 15;
pub(crate) const HUSBANDRY_HEAT_PENALTY: i32 = 20;
pub(crate) const HUSBANDRY_LOW_SUN_THRESHOLD: u8 = 40;
pub(crate) const HUSBANDRY_LOW_SUN_PENALTY: i32 = 10;
pub(crate) const HUSBANDRY_IDEAL_BONUS: i32 = 5;
pub(crate) const HUSBANDRY_IDEAL_WATER: (u8, u8) = (30, 60);
pub(crate) const HUSBANDRY_IDEAL_SUN: (u8, u8) = (60, 100);
pub(crate) const HUSBANDRY_IDEAL_NUTRIENTS: (u8, u8) = (40, 70);
pub(crate) const HUSBANDRY_HEALTHY_ABOVE: u8 = 80;
pub(crate) const HUSBANDRY_STREAK_FOR_INFUSION: u8 = 5;
pub(crate) const HUSBANDRY_INFUSION_SCORE: u32 = 50;
pub(crate) const HUSBANDRY_INFUSIONS_TO_WIN: u8 = 3;

// Level 4: timed care + harvest --------------------------------------------
pub(crate) const HARVEST_START_WATER: u8 = 50;
pub(crate) const HARVEST_START_SUN: u8 = 80;
pub(crate) const HARVEST_START_NUTRIENTS: u8 = 60;
pub(crate) const HARVEST_START_HEALTH: u8 = 70;
pub(crate) const HARVEST_WATER_COOLDOWN_DAYS: u32 = 2;
pub(crate) const HARVEST_FERTILIZE_COOLDOWN_DAYS: u32 = 3;
pub(crate) const HARVEST_WATER_GAIN: i32 = 30;
pub(crate) const HARVEST_WATER_REWARD: i32 = 5;
pub(crate) const HARVEST_WATER_PENALTY: i32 = 5;
pub(crate) const HARVEST_NUTRIENT_GAIN: i32 = 40;
pub(crate) const HARVEST_FERTILIZE_REWARD: i32 = 10;
pub(crate) const HARVEST_FERTILIZE_PENALTY: i32 = 10;
pub(crate) const HARVEST_WATER_DECAY: i32 = 15;
pub(crate) const HARVEST_NUTRIENT_DECAY: i32 = 10;
pub(crate) const HARVEST_SUN_DECAY: i32 = 5;
pub(crate) const HARVEST_SUN_FLOOR: u8 = 60;
pub(crate) const HARVEST_DRY_THRESHOLD: u8 = 20;
pub(crate) const HARVEST_DRY_PENALTY: i32 = 10;
pub(crate) const HARVEST_DARK_PENALTY: i32 = 15;
pub(crate) const HARVEST_HUNGRY_THRESHOLD: u8 = 20;
pub(crate) const HARVEST_HUNGRY_PENALTY: i32 = 5;
pub(crate) const HARVEST_RAIN_WATER: i32 = 20;
pub(crate) const HARVEST_PLAGUE_NUTRIENT_FLOOR: u8 = 40;
pub(crate) const HARVEST_PLAGUE_PENALTY: i32 = 15;
pub(crate) const HARVEST_HEAT_WATER_LOSS: i32 = 15;
pub(crate) const HARVEST_FACT_DAY: u32 = 5;
pub(crate) const HARVEST_FINAL_DAY: u32 = 7;
pub(crate) const HARVEST_HEALTH_GATE: u8 = 90;
pub(crate) const HARVEST_COUNTDOWN_SECS: u32 = 10;
pub(crate) const HARVEST_EARS: usize = 12;
pub(crate) const HARVEST_LARGE_EVERY: usize = 4;
pub(crate) const HARVEST_LARGE_POINTS: i32 = 10;
pub(crate) const HARVEST_SMALL_POINTS: i32 = 5;

// RNG domains ----------------------------------------------------------------
pub(crate) const RNG_DOMAIN_WEATHER: &[u8] = b"husbandry-weather";
pub(crate) const RNG_DOMAIN_FACTS: &[u8] = b"harvest-facts";

//! Event-type name constants, for registering handlers without stringly
//! typos. The schema registry in [`crate::schema`] recognizes exactly this
//! set.

pub const ENCOUNTER_START: &str = "ENCOUNTER_START";
pub const ENCOUNTER_END: &str = "ENCOUNTER_END";

pub const SPELL_CAST_START: &str = "SPELL_CAST_START";
pub const SPELL_CAST_SUCCESS: &str = "SPELL_CAST_SUCCESS";
pub const SPELL_CAST_FAILED: &str = "SPELL_CAST_FAILED";

pub const SPELL_ENERGIZE: &str = "SPELL_ENERGIZE";
pub const SPELL_PERIODIC_ENERGIZE: &str = "SPELL_PERIODIC_ENERGIZE";

pub const SPELL_SUMMON: &str = "SPELL_SUMMON";
pub const SPELL_CREATE: &str = "SPELL_CREATE";

pub const SPELL_AURA_APPLIED: &str = "SPELL_AURA_APPLIED";
pub const SPELL_AURA_APPLIED_DOSE: &str = "SPELL_AURA_APPLIED_DOSE";
pub const SPELL_AURA_REMOVED: &str = "SPELL_AURA_REMOVED";
pub const SPELL_AURA_REMOVED_DOSE: &str = "SPELL_AURA_REMOVED_DOSE";
pub const SPELL_AURA_REFRESH: &str = "SPELL_AURA_REFRESH";
pub const SPELL_AURA_BROKEN_SPELL: &str = "SPELL_AURA_BROKEN_SPELL";

pub const SPELL_DAMAGE: &str = "SPELL_DAMAGE";
pub const SPELL_PERIODIC_DAMAGE: &str = "SPELL_PERIODIC_DAMAGE";
pub const SPELL_HEAL: &str = "SPELL_HEAL";
pub const SPELL_PERIODIC_HEAL: &str = "SPELL_PERIODIC_HEAL";
pub const SPELL_MISSED: &str = "SPELL_MISSED";
pub const SPELL_PERIODIC_MISSED: &str = "SPELL_PERIODIC_MISSED";
pub const SPELL_ABSORBED: &str = "SPELL_ABSORBED";

pub const SPELL_INTERRUPT: &str = "SPELL_INTERRUPT";
pub const SPELL_RESURRECT: &str = "SPELL_RESURRECT";
pub const SPELL_INSTAKILL: &str = "SPELL_INSTAKILL";

pub const RANGE_DAMAGE: &str = "RANGE_DAMAGE";
pub const RANGE_MISSED: &str = "RANGE_MISSED";

pub const SWING_DAMAGE: &str = "SWING_DAMAGE";
pub const SWING_DAMAGE_LANDED: &str = "SWING_DAMAGE_LANDED";
pub const SWING_MISSED: &str = "SWING_MISSED";

pub const UNIT_DIED: &str = "UNIT_DIED";
pub const UNIT_DESTROYED: &str = "UNIT_DESTROYED";
pub const PARTY_KILL: &str = "PARTY_KILL";

pub const ENVIRONMENTAL_DAMAGE: &str = "ENVIRONMENTAL_DAMAGE";

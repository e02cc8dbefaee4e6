//! Static field-schema registry: which named fields live at which raw-field
//! index, per event type.
//!
//! Field names are deliberately shared across event types when they carry
//! the same meaning (`aura_spell_id` for applied and removed auras,
//! `spell_id`/`spell_name` across cast, damage, heal and miss variants), so
//! one handler registered for several types can read a common field without
//! caring which type fired.

/// Schema for one event type: whether the line opens with the 8-field unit
/// key block, and the event's own named fields (0-based indexes into the raw
/// field list).
#[derive(Debug, Clone, Copy)]
pub struct EventSchema {
    pub has_unit_keys: bool,
    pub fields: &'static [(&'static str, usize)],
}

impl EventSchema {
    /// Index of a named field. The event's own names win; when the unit key
    /// block is present the shared block names resolve as well.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields
            .iter()
            .chain(if self.has_unit_keys { UNIT_KEY_FIELDS } else { &[] })
            .find(|(n, _)| *n == name)
            .map(|&(_, i)| i)
    }
}

/// Fixed offsets of the unit key block shared by most event types.
pub mod unit_keys {
    pub const SOURCE_GUID: usize = 0;
    pub const SOURCE_NAME: usize = 1;
    pub const SOURCE_FLAGS: usize = 2;
    pub const SOURCE_FLAGS2: usize = 3;
    pub const DEST_GUID: usize = 4;
    pub const DEST_NAME: usize = 5;
    pub const DEST_FLAGS: usize = 6;
    pub const DEST_FLAGS2: usize = 7;

    /// Raw fields a record must have for the block to be extracted.
    pub const BLOCK_LEN: usize = 8;
}

pub const UNIT_KEY_FIELDS: &[(&str, usize)] = &[
    ("source_guid", unit_keys::SOURCE_GUID),
    ("source_name", unit_keys::SOURCE_NAME),
    ("source_flags", unit_keys::SOURCE_FLAGS),
    ("source_flags2", unit_keys::SOURCE_FLAGS2),
    ("dest_guid", unit_keys::DEST_GUID),
    ("dest_name", unit_keys::DEST_NAME),
    ("dest_flags", unit_keys::DEST_FLAGS),
    ("dest_flags2", unit_keys::DEST_FLAGS2),
];

// Spell identity prefix common to most SPELL_* payloads.
const SPELL_ID_FIELDS: &[(&str, usize)] = &[
    ("spell_id", 8),
    ("spell_name", 9),
    ("spell_school", 10),
];

const AURA_FIELDS: &[(&str, usize)] = &[
    ("aura_spell_id", 8),
    ("aura_spell_name", 9),
    ("aura_spell_school", 10),
    ("aura_buff_type", 11),
];

const AURA_APPLIED_DOSE_FIELDS: &[(&str, usize)] = &[
    ("aura_spell_id", 8),
    ("aura_spell_name", 9),
    ("aura_spell_school", 10),
    ("aura_buff_type", 11),
    ("aura_doses_added", 12),
];

const AURA_REMOVED_DOSE_FIELDS: &[(&str, usize)] = &[
    ("aura_spell_id", 8),
    ("aura_spell_name", 9),
    ("aura_spell_school", 10),
    ("aura_buff_type", 11),
    ("aura_doses_removed", 12),
];

const AURA_BROKEN_SPELL_FIELDS: &[(&str, usize)] = &[
    ("spell_id", 8),
    ("spell_name", 9),
    ("spell_school", 10),
    ("removed_aura_spell_id", 11),
    ("removed_aura_spell_name", 12),
    ("removed_aura_spell_school", 13),
    ("aura_buff_type", 14),
];

const MISSED_FIELDS: &[(&str, usize)] = &[
    ("spell_id", 8),
    ("spell_name", 9),
    ("spell_school", 10),
    ("missed_reason", 11),
];

const CAST_FAILED_FIELDS: &[(&str, usize)] = &[
    ("spell_id", 8),
    ("spell_name", 9),
    ("spell_school", 10),
    ("cast_failed_reason", 11),
];

const INTERRUPT_FIELDS: &[(&str, usize)] = &[
    ("spell_id", 8),
    ("spell_name", 9),
    ("spell_school", 10),
    ("interrupted_spell_id", 11),
    ("interrupted_spell_name", 12),
    ("interrupted_spell_school", 13),
];

// Target and resource snapshot that follows the spell identity in advanced
// payloads (casts, energize, damage, heals).
const CAST_TARGET_FIELDS: &[(&str, usize)] = &[
    ("spell_id", 8),
    ("spell_name", 9),
    ("spell_school", 10),
    ("target_guid", 11),
    ("target_owner_guid", 12),
    ("target_hp", 13),
    ("target_max_hp", 14),
    ("target_attack_power", 15),
    ("target_spell_power", 16),
    ("target_resolve", 17),
    ("spell_resource", 18),
    ("current_resource", 19),
    ("max_resource", 20),
    ("target_pos_x", 21),
    ("target_pos_y", 22),
    ("target_item_level", 23),
];

const ENERGIZE_FIELDS: &[(&str, usize)] = &[
    ("spell_id", 8),
    ("spell_name", 9),
    ("spell_school", 10),
    ("target_guid", 11),
    ("target_owner_guid", 12),
    ("target_hp", 13),
    ("target_max_hp", 14),
    ("target_attack_power", 15),
    ("target_spell_power", 16),
    ("target_resolve", 17),
    ("spell_resource", 18),
    ("current_resource", 19),
    ("max_resource", 20),
    ("target_pos_x", 21),
    ("target_pos_y", 22),
    ("target_item_level", 23),
    ("resource_gain", 24),
    ("resource_type", 25),
];

const SPELL_DAMAGE_FIELDS: &[(&str, usize)] = &[
    ("spell_id", 8),
    ("spell_name", 9),
    ("spell_school", 10),
    ("target_guid", 11),
    ("target_owner_guid", 12),
    ("target_hp", 13),
    ("target_max_hp", 14),
    ("target_attack_power", 15),
    ("target_spell_power", 16),
    ("target_resolve", 17),
    ("spell_resource", 18),
    ("current_resource", 19),
    ("max_resource", 20),
    ("target_pos_x", 21),
    ("target_pos_y", 22),
    ("target_item_level", 23),
    ("damage_done", 24),
    ("overkill", 25),
    ("damage_school", 26),
];

const RANGE_DAMAGE_FIELDS: &[(&str, usize)] = &[
    ("spell_id", 8),
    ("spell_name", 9),
    ("spell_school", 10),
    ("target_guid", 11),
    ("target_owner_guid", 12),
    ("target_hp", 13),
    ("target_max_hp", 14),
    ("target_attack_power", 15),
    ("target_spell_power", 16),
    ("target_resolve", 17),
    ("spell_resource", 18),
    ("current_resource", 19),
    ("max_resource", 20),
    ("target_pos_x", 21),
    ("target_pos_y", 22),
    ("target_item_level", 23),
    ("damage_done", 24),
    ("overkill", 25),
];

const HEAL_FIELDS: &[(&str, usize)] = &[
    ("spell_id", 8),
    ("spell_name", 9),
    ("spell_school", 10),
    ("target_guid", 11),
    ("target_owner_guid", 12),
    ("target_hp", 13),
    ("target_max_hp", 14),
    ("target_attack_power", 15),
    ("target_spell_power", 16),
    ("target_resolve", 17),
    ("spell_resource", 18),
    ("current_resource", 19),
    ("max_resource", 20),
    ("target_pos_x", 21),
    ("target_pos_y", 22),
    ("target_item_level", 23),
    ("heal_amount", 24),
    ("overheal", 25),
    ("heal_school", 26),
];

// Swing payloads carry no spell identity; the target snapshot starts at 8.
const SWING_DAMAGE_FIELDS: &[(&str, usize)] = &[
    ("target_guid", 8),
    ("target_owner_guid", 9),
    ("target_hp", 10),
    ("target_max_hp", 11),
    ("target_attack_power", 12),
    ("target_spell_power", 13),
    ("target_resolve", 14),
    ("spell_resource", 15),
    ("current_resource", 16),
    ("max_resource", 17),
    ("target_pos_x", 18),
    ("target_pos_y", 19),
    ("target_item_level", 20),
    ("damage_done", 21),
    ("overkill", 22),
    ("damage_school", 23),
];

const SWING_MISSED_FIELDS: &[(&str, usize)] = &[("missed_reason", 8)];

const ENVIRONMENTAL_DAMAGE_FIELDS: &[(&str, usize)] = &[
    ("target_guid", 8),
    ("target_owner_guid", 9),
    ("target_hp", 10),
    ("target_max_hp", 11),
    ("target_attack_power", 12),
    ("target_spell_power", 13),
    ("target_resolve", 14),
    ("spell_resource", 15),
    ("current_resource", 16),
    ("max_resource", 17),
    ("target_pos_x", 18),
    ("target_pos_y", 19),
    ("target_item_level", 20),
    ("damage_name", 21),
];

const ENCOUNTER_START_FIELDS: &[(&str, usize)] = &[
    ("encounter_id", 0),
    ("encounter_name", 1),
    ("difficulty_id", 2),
    ("raid_size", 3),
];

const ENCOUNTER_END_FIELDS: &[(&str, usize)] = &[
    ("encounter_id", 0),
    ("encounter_name", 1),
    ("difficulty_id", 2),
    ("raid_size", 3),
    ("wiped", 4),
];

// These three carry the unit key block, yet their own named fields begin at
// 0 or 4 inside it. Unit-name extraction still reads the fixed 0-7 block.
const UNIT_FIELDS: &[(&str, usize)] = &[
    ("unit_guid", 4),
    ("unit_name", 5),
    ("unit_flags", 6),
    ("unit_flags2", 7),
];

const PARTY_KILL_FIELDS: &[(&str, usize)] = &[
    ("friendly_guid", 0),
    ("friendly_name", 1),
    ("friendly_flags", 2),
    ("friendly_flags2", 3),
    ("enemy_guid", 4),
    ("enemy_name", 5),
    ("enemy_flags", 6),
    ("enemy_flags2", 7),
];

// Payload layout not mapped yet; fields stay positional-only.
const UNMAPPED_FIELDS: &[(&str, usize)] = &[];

static EVENT_SCHEMAS: phf::Map<&'static str, EventSchema> = phf::phf_map! {
    "ENCOUNTER_START" => EventSchema { has_unit_keys: false, fields: ENCOUNTER_START_FIELDS },
    "ENCOUNTER_END" => EventSchema { has_unit_keys: false, fields: ENCOUNTER_END_FIELDS },
    "SPELL_CAST_START" => EventSchema { has_unit_keys: false, fields: SPELL_ID_FIELDS },
    "SPELL_CAST_SUCCESS" => EventSchema { has_unit_keys: true, fields: CAST_TARGET_FIELDS },
    "SPELL_CAST_FAILED" => EventSchema { has_unit_keys: true, fields: CAST_FAILED_FIELDS },
    "SPELL_ENERGIZE" => EventSchema { has_unit_keys: true, fields: ENERGIZE_FIELDS },
    "SPELL_PERIODIC_ENERGIZE" => EventSchema { has_unit_keys: true, fields: ENERGIZE_FIELDS },
    "SPELL_SUMMON" => EventSchema { has_unit_keys: true, fields: SPELL_ID_FIELDS },
    "SPELL_CREATE" => EventSchema { has_unit_keys: true, fields: SPELL_ID_FIELDS },
    "SPELL_AURA_APPLIED" => EventSchema { has_unit_keys: true, fields: AURA_FIELDS },
    "SPELL_AURA_APPLIED_DOSE" => EventSchema { has_unit_keys: true, fields: AURA_APPLIED_DOSE_FIELDS },
    "SPELL_AURA_REMOVED" => EventSchema { has_unit_keys: true, fields: AURA_FIELDS },
    "SPELL_AURA_REMOVED_DOSE" => EventSchema { has_unit_keys: true, fields: AURA_REMOVED_DOSE_FIELDS },
    "SPELL_AURA_REFRESH" => EventSchema { has_unit_keys: true, fields: AURA_FIELDS },
    "SPELL_AURA_BROKEN_SPELL" => EventSchema { has_unit_keys: true, fields: AURA_BROKEN_SPELL_FIELDS },
    "SPELL_MISSED" => EventSchema { has_unit_keys: true, fields: MISSED_FIELDS },
    "SPELL_PERIODIC_MISSED" => EventSchema { has_unit_keys: true, fields: MISSED_FIELDS },
    "SPELL_ABSORBED" => EventSchema { has_unit_keys: true, fields: UNMAPPED_FIELDS },
    "SPELL_DAMAGE" => EventSchema { has_unit_keys: true, fields: SPELL_DAMAGE_FIELDS },
    "SPELL_PERIODIC_DAMAGE" => EventSchema { has_unit_keys: true, fields: SPELL_DAMAGE_FIELDS },
    "SPELL_HEAL" => EventSchema { has_unit_keys: true, fields: HEAL_FIELDS },
    "SPELL_PERIODIC_HEAL" => EventSchema { has_unit_keys: true, fields: HEAL_FIELDS },
    "SPELL_INTERRUPT" => EventSchema { has_unit_keys: true, fields: INTERRUPT_FIELDS },
    "SPELL_RESURRECT" => EventSchema { has_unit_keys: true, fields: SPELL_ID_FIELDS },
    "SPELL_INSTAKILL" => EventSchema { has_unit_keys: true, fields: SPELL_ID_FIELDS },
    "RANGE_DAMAGE" => EventSchema { has_unit_keys: true, fields: RANGE_DAMAGE_FIELDS },
    "RANGE_MISSED" => EventSchema { has_unit_keys: true, fields: MISSED_FIELDS },
    "SWING_DAMAGE" => EventSchema { has_unit_keys: true, fields: SWING_DAMAGE_FIELDS },
    "SWING_DAMAGE_LANDED" => EventSchema { has_unit_keys: true, fields: SWING_DAMAGE_FIELDS },
    "SWING_MISSED" => EventSchema { has_unit_keys: true, fields: SWING_MISSED_FIELDS },
    "UNIT_DIED" => EventSchema { has_unit_keys: true, fields: UNIT_FIELDS },
    "UNIT_DESTROYED" => EventSchema { has_unit_keys: true, fields: UNIT_FIELDS },
    "PARTY_KILL" => EventSchema { has_unit_keys: true, fields: PARTY_KILL_FIELDS },
    "ENVIRONMENTAL_DAMAGE" => EventSchema { has_unit_keys: true, fields: ENVIRONMENTAL_DAMAGE_FIELDS },
};

pub fn get(event: &str) -> Option<&'static EventSchema> {
    EVENT_SCHEMAS.get(event)
}

pub fn has_schema(event: &str) -> bool {
    EVENT_SCHEMAS.contains_key(event)
}

pub fn unit_keys_present(event: &str) -> bool {
    get(event).is_some_and(|s| s.has_unit_keys)
}

/// Index of `field` within `event`'s raw field list. Case-sensitive exact
/// match; `None` when the event or field is unknown.
pub fn field_index(event: &str, field: &str) -> Option<usize> {
    get(event)?.field_index(field)
}

/// All recognized event-type names, for runtime introspection.
pub fn event_types() -> impl Iterator<Item = &'static str> {
    EVENT_SCHEMAS.keys().copied()
}

use hashbrown::HashMap;

/// Pure storage for facts the session learns while parsing: GUID-to-name and
/// aura-spell-id-to-name mappings. Population happens inside the parse pass;
/// handlers only read.
///
/// Both maps keep the first name seen for a key. Combat logs occasionally
/// rename a unit mid-session (pet re-summons reuse GUIDs); the first sighting
/// is the one the rest of the log refers back to.
#[derive(Debug, Default)]
pub struct SessionCache {
    unit_names: HashMap<String, String>,
    aura_names: HashMap<u32, String>,
}

impl SessionCache {
    pub fn unit_name(&self, guid: &str) -> Option<&str> {
        self.unit_names.get(guid).map(String::as_str)
    }

    pub fn aura_name(&self, spell_id: u32) -> Option<&str> {
        self.aura_names.get(&spell_id).map(String::as_str)
    }

    pub fn unit_count(&self) -> usize {
        self.unit_names.len()
    }

    pub fn aura_count(&self) -> usize {
        self.aura_names.len()
    }

    pub(crate) fn learn_unit(&mut self, guid: &str, name: &str) {
        if guid.is_empty() || self.unit_names.contains_key(guid) {
            return;
        }
        self.unit_names.insert(guid.to_string(), name.to_string());
    }

    pub(crate) fn learn_aura(&mut self, spell_id: u32, name: &str) {
        self.aura_names
            .entry(spell_id)
            .or_insert_with(|| name.to_string());
    }
}

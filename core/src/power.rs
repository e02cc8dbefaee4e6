use serde::Serialize;

/// Resource kinds reported in the `resource_type` field of energize events.
/// The log carries the raw numeric id; `-2` is the health pseudo-resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PowerType {
    Health,
    Mana,
    Rage,
    Focus,
    Energy,
    Runes,
    RunicPower,
    SoulShards,
    Eclipse,
    HolyPower,
    AlternatePower,
    Chi,
    ShadowOrbs,
    BurningEmbers,
    DemonicFury,
}

impl PowerType {
    /// Decode the numeric id the log reports. `None` for ids outside the
    /// known set (id 4 and 11 are unassigned in this log format).
    pub fn from_id(id: i32) -> Option<Self> {
        Some(match id {
            -2 => Self::Health,
            0 => Self::Mana,
            1 => Self::Rage,
            2 => Self::Focus,
            3 => Self::Energy,
            5 => Self::Runes,
            6 => Self::RunicPower,
            7 => Self::SoulShards,
            8 => Self::Eclipse,
            9 => Self::HolyPower,
            10 => Self::AlternatePower,
            12 => Self::Chi,
            13 => Self::ShadowOrbs,
            14 => Self::BurningEmbers,
            15 => Self::DemonicFury,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_ids_decode() {
        assert_eq!(PowerType::from_id(-2), Some(PowerType::Health));
        assert_eq!(PowerType::from_id(0), Some(PowerType::Mana));
        assert_eq!(PowerType::from_id(12), Some(PowerType::Chi));
        assert_eq!(PowerType::from_id(15), Some(PowerType::DemonicFury));
    }

    #[test]
    fn gaps_and_out_of_range_ids_do_not() {
        assert_eq!(PowerType::from_id(4), None);
        assert_eq!(PowerType::from_id(11), None);
        assert_eq!(PowerType::from_id(16), None);
        assert_eq!(PowerType::from_id(-1), None);
    }
}

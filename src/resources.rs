pub const CEDICT_JSON: &str = include_str!("resources/cedict.json");

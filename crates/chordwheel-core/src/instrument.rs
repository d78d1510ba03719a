//! Instrument selection carried by a song

use serde::{Deserialize, Serialize};

/// Instruments bundled with the app
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuiltinInstrument {
    #[default]
    Piano,
    ElectricPiano,
    Organ,
    AcousticGuitar,
    ElectricGuitar,
    Bass,
    Strings,
    Pad,
    Synth,
}

impl BuiltinInstrument {
    pub const ALL: [BuiltinInstrument; 9] = [
        Self::Piano,
        Self::ElectricPiano,
        Self::Organ,
        Self::AcousticGuitar,
        Self::ElectricGuitar,
        Self::Bass,
        Self::Strings,
        Self::Pad,
        Self::Synth,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Piano => "Piano",
            Self::ElectricPiano => "Electric Piano",
            Self::Organ => "Organ",
            Self::AcousticGuitar => "Acoustic Guitar",
            Self::ElectricGuitar => "Electric Guitar",
            Self::Bass => "Bass",
            Self::Strings => "Strings",
            Self::Pad => "Pad",
            Self::Synth => "Synth",
        }
    }
}

/// Either a bundled instrument or a user-defined patch referenced by id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Instrument {
    Builtin { instrument: BuiltinInstrument },
    Custom { id: String, name: String },
}

impl Default for Instrument {
    fn default() -> Self {
        Self::builtin(BuiltinInstrument::default())
    }
}

impl Instrument {
    pub fn builtin(instrument: BuiltinInstrument) -> Self {
        Self::Builtin { instrument }
    }

    pub fn custom(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Custom {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Builtin { instrument } => instrument.name(),
            Self::Custom { name, .. } => name,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(Instrument::default().name(), "Piano");
        let custom = Instrument::custom("patch-7", "Warm Rhodes");
        assert_eq!(custom.name(), "Warm Rhodes");
        assert!(custom.is_custom());
    }

    #[test]
    fn test_tagged_serialization() {
        let guitar = Instrument::builtin(BuiltinInstrument::ElectricGuitar);
        let json = serde_json::to_value(guitar).unwrap();
        assert_eq!(json["kind"], "builtin");
        assert_eq!(json["instrument"], "electric-guitar");

        let custom: Instrument =
            serde_json::from_str(r#"{"kind":"custom","id":"x1","name":"Choir"}"#).unwrap();
        assert_eq!(custom, Instrument::custom("x1", "Choir"));
    }
}

//! The documents this engine manages and their binding tables.

use crate::binding::FieldBinding;
use crate::coerce::TypeTag;
use serde::Serialize;
use std::fmt;

/// One of the named configuration documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Credentials,
    Settings,
    ServerConfig,
    PlayerDefaults,
    Constants,
    DemoData,
}

impl DocumentKind {
    /// All documents, in materialization order.
    pub const ALL: [DocumentKind; 6] = [
        DocumentKind::Credentials,
        DocumentKind::Settings,
        DocumentKind::ServerConfig,
        DocumentKind::PlayerDefaults,
        DocumentKind::Constants,
        DocumentKind::DemoData,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DocumentKind::Credentials => "credentials",
            DocumentKind::Settings => "settings",
            DocumentKind::ServerConfig => "serverconfig",
            DocumentKind::PlayerDefaults => "playerdefaults",
            DocumentKind::Constants => "constants",
            DocumentKind::DemoData => "demodata",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// File name in the live configuration directory.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }

    /// File name of the template in the defaults directory.
    pub fn default_file_name(&self) -> String {
        format!("default_{}.json", self.name())
    }

    pub fn bindings(&self) -> &'static [FieldBinding] {
        match self {
            DocumentKind::Credentials => CREDENTIALS,
            DocumentKind::Settings => SETTINGS,
            DocumentKind::ServerConfig => SERVER_CONFIG,
            DocumentKind::PlayerDefaults => PLAYER_DEFAULTS,
            DocumentKind::Constants => CONSTANTS,
            DocumentKind::DemoData => DEMO_DATA,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static CREDENTIALS: &[FieldBinding] = &[
    FieldBinding::nested("DISCORD_TOKEN", TypeTag::String, "discord", "token"),
    // Google service account key
    FieldBinding::nested("G_TYPE", TypeTag::String, "google", "type"),
    FieldBinding::nested("G_PROJECT_ID", TypeTag::String, "google", "project_id"),
    FieldBinding::nested("G_PRIVATE_KEY_ID", TypeTag::String, "google", "private_key_id"),
    FieldBinding::nested("G_PRIVATE_KEY", TypeTag::String, "google", "private_key"),
    FieldBinding::nested("G_CLIENT_EMAIL", TypeTag::String, "google", "client_email"),
    FieldBinding::nested("G_CLIENT_ID", TypeTag::String, "google", "client_id"),
    FieldBinding::nested("G_AUTH_URI", TypeTag::String, "google", "auth_uri"),
    FieldBinding::nested("G_TOKEN_URI", TypeTag::String, "google", "token_uri"),
    FieldBinding::nested(
        "G_AUTH_PROVIDER_X509_CERT_URL",
        TypeTag::String,
        "google",
        "auth_provider_x509_cert_url",
    ),
    FieldBinding::nested("G_CLIENT_X509_CERT_URL", TypeTag::String, "google", "client_x509_cert_url"),
];

static SETTINGS: &[FieldBinding] = &[
    FieldBinding::top("COMMAND_PREFIX", TypeTag::String, "commandPrefix"),
    FieldBinding::top("DEBUG_MODE", TypeTag::Boolean, "debug"),
    FieldBinding::top("SPREADSHEET_ID", TypeTag::String, "spreadsheetID"),
    FieldBinding::top("PIXELS_PER_M", TypeTag::Float, "pixelsPerMeter"),
    FieldBinding::top("STAMINA_USE_RATE", TypeTag::Float, "staminaUseRate"),
    FieldBinding::top("HEATED_SLOWDOWN_RATE", TypeTag::Float, "heatedSlowdownRate"),
    FieldBinding::top("AUTO_SAVE_INTERVAL", TypeTag::Integer, "autoSaveInterval"),
    FieldBinding::top("DICE_MIN", TypeTag::Integer, "diceMin"),
    FieldBinding::top("DICE_MAX", TypeTag::Integer, "diceMax"),
    FieldBinding::top("DEFAULT_DROP_FIXTURE", TypeTag::String, "defaultDropFixture"),
    FieldBinding::top("DEFAULT_ROOM_ICON_URL", TypeTag::String, "defaultRoomIconURL"),
    FieldBinding::top("AUTO_DELETE_WHISPER_CHANNELS", TypeTag::Boolean, "autoDeleteWhisperChannels"),
    FieldBinding::top("SHOW_ONLINE_PLAYER_COUNT", TypeTag::Boolean, "showOnlinePlayerCount"),
    FieldBinding::top("EMBED_COLOR", TypeTag::String, "embedColor"),
    FieldBinding::nested("ONLINE_ACTIVITY_TYPE", TypeTag::String, "onlineActivity", "type"),
    FieldBinding::nested("ONLINE_ACTIVITY_STRING", TypeTag::String, "onlineActivity", "string"),
    FieldBinding::nested("DEBUG_MODE_ACTIVITY_TYPE", TypeTag::String, "debugModeActivity", "type"),
    FieldBinding::nested("DEBUG_MODE_ACTIVITY_STRING", TypeTag::String, "debugModeActivity", "string"),
    FieldBinding::nested("GAME_IN_PROGRESS_ACTIVITY_TYPE", TypeTag::String, "gameInProgressActivity", "type"),
    FieldBinding::nested(
        "GAME_IN_PROGRESS_ACTIVITY_STRING",
        TypeTag::String,
        "gameInProgressActivity",
        "string",
    ),
];

static SERVER_CONFIG: &[FieldBinding] = &[
    FieldBinding::top("MODERATOR_ROLE", TypeTag::String, "moderatorRole"),
    FieldBinding::top("PLAYER_ROLE", TypeTag::String, "playerRole"),
    FieldBinding::top("DEAD_ROLE", TypeTag::String, "deadRole"),
    FieldBinding::top("SPECTATOR_ROLE", TypeTag::String, "spectatorRole"),
    FieldBinding::top("TESTER_ROLE", TypeTag::String, "testerRole"),
    FieldBinding::top("ELIGIBLE_ROLE", TypeTag::String, "eligibleRole"),
    FieldBinding::top("HEADMASTER_ROLE", TypeTag::String, "headmasterRole"),
    FieldBinding::top("ROOM_CATEGORIES", TypeTag::String, "roomCategories"),
    FieldBinding::top("WHISPER_CATEGORY", TypeTag::String, "whisperCategory"),
    FieldBinding::top("SPECTATE_CATEGORY", TypeTag::String, "spectateCategory"),
    FieldBinding::top("TESTING_CHANNEL", TypeTag::String, "testingChannel"),
    FieldBinding::top("GENERAL_CHANNEL", TypeTag::String, "generalChannel"),
    FieldBinding::top("ANNOUNCEMENT_CHANNEL", TypeTag::String, "announcementChannel"),
    FieldBinding::top("COMMAND_CHANNEL", TypeTag::String, "commandChannel"),
    FieldBinding::top("LOG_CHANNEL", TypeTag::String, "logChannel"),
];

static PLAYER_DEFAULTS: &[FieldBinding] = &[
    FieldBinding::top("DEFAULT_PRONOUNS", TypeTag::String, "defaultPronouns"),
    FieldBinding::top("DEFAULT_VOICE", TypeTag::String, "defaultVoice"),
    FieldBinding::nested("DEFAULT_STRENGTH", TypeTag::Integer, "defaultStats", "strength"),
    FieldBinding::nested("DEFAULT_PERCEPTION", TypeTag::Integer, "defaultStats", "perception"),
    FieldBinding::nested("DEFAULT_DEXTERITY", TypeTag::Integer, "defaultStats", "dexterity"),
    FieldBinding::nested("DEFAULT_SPEED", TypeTag::Integer, "defaultStats", "speed"),
    FieldBinding::nested("DEFAULT_STAMINA", TypeTag::Integer, "defaultStats", "stamina"),
    FieldBinding::top("DEFAULT_LOCATION", TypeTag::String, "defaultLocation"),
    FieldBinding::top("DEFAULT_STATUS_EFFECTS", TypeTag::String, "defaultStatusEffects"),
    FieldBinding::top("DEFAULT_INVENTORY", TypeTag::Array, "defaultInventory"),
    FieldBinding::top("DEFAULT_DESCRIPTION", TypeTag::String, "defaultDescription"),
];

static CONSTANTS: &[FieldBinding] = &[
    FieldBinding::top("OFFLINE_STATUS_INTERVAL", TypeTag::Integer, "offlineStatusInterval"),
    FieldBinding::top("COMMANDS_DIR", TypeTag::String, "commandsDir"),
    FieldBinding::top("DATA_DIR", TypeTag::String, "dataDir"),
    FieldBinding::top("MODULES_DIR", TypeTag::String, "modulesDir"),
];

static DEMO_DATA: &[FieldBinding] = &[
    FieldBinding::top("DEMODATA_ROOMS", TypeTag::Array, "rooms"),
    FieldBinding::top("DEMODATA_OBJECTS", TypeTag::Array, "objects"),
    FieldBinding::top("DEMODATA_PREFABS", TypeTag::Array, "prefabs"),
    FieldBinding::top("DEMODATA_RECIPES", TypeTag::Array, "recipes"),
    FieldBinding::top("DEMODATA_ITEMS", TypeTag::Array, "items"),
    FieldBinding::top("DEMODATA_PUZZLES", TypeTag::Array, "puzzles"),
    FieldBinding::top("DEMODATA_EVENTS", TypeTag::Array, "events"),
    FieldBinding::top("DEMODATA_STATUS_EFFECTS", TypeTag::Array, "statusEffects"),
    FieldBinding::top("DEMODATA_GESTURES", TypeTag::Array, "gestures"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_round_trip() {
        for kind in DocumentKind::ALL {
            assert_eq!(DocumentKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(DocumentKind::from_name("secrets"), None);
    }

    #[test]
    fn test_file_names() {
        assert_eq!(DocumentKind::ServerConfig.file_name(), "serverconfig.json");
        assert_eq!(
            DocumentKind::PlayerDefaults.default_file_name(),
            "default_playerdefaults.json"
        );
    }

    #[test]
    fn test_tables_have_unique_variables_and_paths() {
        let mut all_variables = HashSet::new();
        for kind in DocumentKind::ALL {
            let mut paths = HashSet::new();
            for binding in kind.bindings() {
                assert!(
                    all_variables.insert(binding.variable),
                    "{} bound twice",
                    binding.variable
                );
                assert!(paths.insert(binding.path), "{kind}: {} bound twice", binding.path);
            }
        }
    }

    #[test]
    fn test_documented_variables_are_bound() {
        let bound = |kind: DocumentKind, variable: &str| {
            kind.bindings().iter().any(|b| b.variable == variable)
        };
        assert!(bound(DocumentKind::Credentials, "DISCORD_TOKEN"));
        assert!(bound(DocumentKind::Credentials, "G_PROJECT_ID"));
        assert!(bound(DocumentKind::Settings, "COMMAND_PREFIX"));
        assert!(bound(DocumentKind::Settings, "DEBUG_MODE"));
        assert!(bound(DocumentKind::Settings, "PIXELS_PER_M"));
        assert!(bound(DocumentKind::PlayerDefaults, "DEFAULT_INVENTORY"));
        assert!(bound(DocumentKind::DemoData, "DEMODATA_ROOMS"));
    }
}

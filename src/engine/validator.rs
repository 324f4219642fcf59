use std::collections::HashMap;

/// Pure judgement over the submitted answer text.
pub type Predicate = fn(&str) -> bool;

pub const DEFAULT_VALIDATOR: &str = "default";

const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWER: &str = "abcdefghijklmnopqrstuvwxyz";
const DIGITS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+-=[]{}|;:,.<>?";
const MIN_PASSWORD_LEN: usize = 12;

fn contains_any(text: &str, set: &str) -> bool {
    text.chars().any(|c| set.contains(c))
}

fn answer_contains(answer: &str, needle: &str) -> bool {
    answer.to_lowercase().contains(needle)
}

pub fn password_strength(answer: &str) -> bool {
    answer.chars().count() >= MIN_PASSWORD_LEN
        && contains_any(answer, UPPER)
        && contains_any(answer, LOWER)
        && contains_any(answer, DIGITS)
        && contains_any(answer, SYMBOLS)
}

pub fn password_manager(answer: &str) -> bool {
    answer_contains(answer, "c")
}

pub fn recon_phish(answer: &str) -> bool {
    // "yes" contains "y", so one check covers both spellings.
    answer_contains(answer, "y")
}

pub fn phishing_awareness(answer: &str) -> bool {
    answer_contains(answer, "b")
}

pub fn data_collection(answer: &str) -> bool {
    answer_contains(answer, "a")
}

pub fn social_media_privacy(answer: &str) -> bool {
    answer_contains(answer, "b")
}

pub fn vpn_usage(answer: &str) -> bool {
    answer_contains(answer, "b")
}

pub fn https_importance(answer: &str) -> bool {
    answer_contains(answer, "c")
}

pub fn fake_site(answer: &str) -> bool {
    answer_contains(answer, "d")
}

pub fn browser_settings(answer: &str) -> bool {
    answer_contains(answer, "b")
}

pub fn device_encryption(answer: &str) -> bool {
    answer_contains(answer, "bitlocker")
}

pub fn software_update(answer: &str) -> bool {
    answer_contains(answer, "c")
}

pub fn secure_wifi(answer: &str) -> bool {
    answer_contains(answer, "a")
}

/// Placeholder: any answer is accepted.
pub fn multiple_choice(_answer: &str) -> bool {
    true
}

pub fn free_response(answer: &str) -> bool {
    !answer.is_empty()
}

pub fn default_reject(_answer: &str) -> bool {
    false
}

/// String tag to predicate lookup. Unknown and empty tags resolve to
/// [`default_reject`] so an unconfigured challenge can never pass.
#[derive(Clone, Debug, Default)]
pub struct ValidatorRegistry {
    predicates: HashMap<String, Predicate>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut registry = Self::new();
        let builtins: [(&str, Predicate); 16] = [
            ("passwordStrength", password_strength),
            ("passwordManager", password_manager),
            ("reconPhish", recon_phish),
            ("phishingAwareness", phishing_awareness),
            ("dataCollection", data_collection),
            ("socialMediaPrivacy", social_media_privacy),
            ("vpnUsage", vpn_usage),
            ("httpsImportance", https_importance),
            ("fakeSite", fake_site),
            ("browserSettings", browser_settings),
            ("deviceEncryption", device_encryption),
            ("softwareUpdate", software_update),
            ("secureWifi", secure_wifi),
            ("multipleChoice", multiple_choice),
            ("freeResponse", free_response),
            (DEFAULT_VALIDATOR, default_reject),
        ];
        for (id, predicate) in builtins {
            registry.register(id, predicate);
        }
        registry
    }

    /// Registering an existing id replaces its predicate. Empty ids are ignored.
    pub fn register(&mut self, id: &str, predicate: Predicate) {
        if id.is_empty() {
            return;
        }
        self.predicates.insert(id.to_string(), predicate);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.predicates.contains_key(id)
    }

    pub fn lookup(&self, id: &str) -> Predicate {
        self.predicates.get(id).copied().unwrap_or(default_reject)
    }

    pub fn validate(&self, id: &str, answer: &str) -> bool {
        self.lookup(id)(answer)
    }

    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.predicates.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

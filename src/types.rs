//! Portfolio data model shared by the fetch cycle and the sections.
use std::fmt;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Asset paths relative to the site base URL.
pub const INFO_PATH: &str = "assets/info.json";
pub const CERTS_PATH: &str = "assets/certs.json";
pub const TECH_STACKS_PATH: &str = "assets/techStacks.json";

/// Source repository of the site itself (social buttons).
pub const PROJECT_URL: &str = "https://github.com/masteryyh/masteryyh.github.io";
/// Handle shown next to the name in the hero header.
pub const HANDLE: &str = "masteryyh";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    pub wechat: String,
    pub phone: String,
    pub github: String,
    pub linkedin: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub contact: Contact,
}

/// One credential; `issuer` is a translation key, not display text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cert {
    pub name: String,
    pub issuer: String,
    pub year: String,
    pub href: String,
}

/// A labelled group of skill badges. `label` is a translation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackGroup {
    pub label: String,
    pub items: Vec<String>,
}

/// Skill groups in document order. Deserialized from a JSON object whose
/// keys are group labels, keeping the order the keys appear in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechStack(pub Vec<StackGroup>);

impl TechStack {
    pub fn groups(&self) -> &[StackGroup] { &self.0 }
}

impl<'de> Deserialize<'de> for TechStack {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GroupsVisitor;

        impl<'de> Visitor<'de> for GroupsVisitor {
            type Value = TechStack;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping group labels to skill lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<TechStack, A::Error> {
                let mut groups = Vec::with_capacity(map.size_hint().unwrap_or(4));
                while let Some((label, items)) = map.next_entry::<String, Vec<String>>()? {
                    // later duplicate keys replace earlier ones in place (JSON object semantics)
                    if let Some(g) = groups.iter_mut().find(|g: &&mut StackGroup| g.label == label) {
                        g.items = items;
                    } else {
                        groups.push(StackGroup { label, items });
                    }
                }
                Ok(TechStack(groups))
            }
        }

        deserializer.deserialize_map(GroupsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn tech_stack_keeps_document_order() {
        let raw = r#"{"zeta":["A"],"alpha":["X","Y"],"mid":[]}"#;
        let stack: TechStack = serde_json::from_str(raw).unwrap();
        let labels: Vec<&str> = stack.groups().iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["zeta", "alpha", "mid"]);
        assert_eq!(stack.groups()[1].items, vec!["X".to_string(), "Y".to_string()]);
    }

    #[test]
    fn tech_stack_duplicate_key_replaces_in_place() {
        let stack: TechStack = serde_json::from_str(r#"{"a":["1"],"b":["2"],"a":["3"]}"#).unwrap();
        assert_eq!(stack.groups().len(), 2);
        assert_eq!(stack.groups()[0].items, vec!["3".to_string()]);
    }

    #[test]
    fn tech_stack_rejects_non_object() {
        assert!(serde_json::from_str::<TechStack>(r#"["a","b"]"#).is_err());
        assert!(serde_json::from_str::<TechStack>(r#"{"a":"not a list"}"#).is_err());
    }

    #[test]
    fn profile_parses_shipped_asset() {
        let raw = include_str!("../assets/info.json");
        let profile: Profile = serde_json::from_str(raw).unwrap();
        assert!(!profile.name.is_empty());
        assert!(profile.contact.github.starts_with("https://"));
    }

    #[test]
    fn certs_parse_shipped_asset() {
        let raw = include_str!("../assets/certs.json");
        let certs: Vec<Cert> = serde_json::from_str(raw).unwrap();
        assert_eq!(certs.len(), 3);
        assert!(certs.iter().all(|c| c.issuer == "cert.linuxFoundation"));
    }
}

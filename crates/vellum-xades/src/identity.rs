#![forbid(unsafe_code)]

//! eID identity signature facet.
//!
//! Signatures created with an eID card may sign a `ds:Object` holding the
//! holder's identity (`be:fedict:eid:identity:1.0`). The object is found
//! through the SignedInfo reference of that type.

use roxmltree::Node;
use tracing::{debug, warn};
use vellum_core::{algorithm, ns};
use vellum_dsig::signature::signed_element;
use vellum_dsig::EmbeddedSignature;
use vellum_xml::node::{decode_base64, find_child_element, is_element, text_content};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    fn parse(text: &str) -> Option<Self> {
        match text {
            "MALE" => Some(Gender::Male),
            "FEMALE" => Some(Gender::Female),
            _ => None,
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Gender::Male => "male",
            Gender::Female => "female",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub mime_type: Option<String>,
    pub data: Vec<u8>,
}

/// Identity of the card holder as signed along with the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub gender: Option<Gender>,
    pub photo: Option<Photo>,
}

impl Identity {
    /// Read the identity facet of `signature`, if it signs one.
    ///
    /// The reference must resolve to exactly one element: either a
    /// `ds:Object` whose `identity:Identity` child is read, or the
    /// `identity:Identity` element itself.
    pub fn extract(signature_node: Node<'_, '_>, signature: &EmbeddedSignature) -> Option<Self> {
        let reference = signature.reference_of_type(algorithm::IDENTITY_REFERENCE)?;
        let element = signed_element(signature_node, reference).and_then(|target| {
            if is_element(target, ns::IDENTITY, ns::node::IDENTITY) {
                Some(target)
            } else if is_element(target, ns::DSIG, ns::node::OBJECT) {
                find_child_element(target, ns::IDENTITY, ns::node::IDENTITY)
            } else {
                None
            }
        });
        let Some(element) = element else {
            warn!(signature = %signature.label(), uri = %reference.uri, "identity reference target not found");
            return None;
        };

        let text = |local: &str| find_child_element(element, ns::IDENTITY, local).and_then(text_content);
        let gender = text(ns::node::GENDER).and_then(|g| {
            let parsed = Gender::parse(&g);
            if parsed.is_none() {
                warn!(gender = %g, "unknown gender value");
            }
            parsed
        });
        let photo = find_child_element(element, ns::IDENTITY, ns::node::PHOTO).and_then(|node| {
            match decode_base64(node) {
                Ok(data) => Some(Photo {
                    mime_type: node.attribute(ns::attr::MIME_TYPE).map(str::to_owned),
                    data,
                }),
                Err(e) => {
                    warn!(error = %e, "ignoring undecodable identity photo");
                    None
                }
            }
        });

        let identity = Self {
            name: text(ns::node::NAME),
            first_name: text(ns::node::FIRST_NAME),
            middle_name: text(ns::node::MIDDLE_NAME),
            gender,
            photo,
        };
        debug!(signature = %signature.label(), name = ?identity.name, "extracted identity facet");
        Some(identity)
    }
}

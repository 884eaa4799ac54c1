#![forbid(unsafe_code)]

//! XAdES qualifying properties of a signature.
//!
//! Extraction never fails: a property that is absent or cannot be decoded
//! is logged and left out, and the signature is judged on what remains.

use chrono::{DateTime, Utc};
use roxmltree::Node;
use tracing::{debug, warn};
use vellum_core::{algorithm, ns, Error};
use vellum_crypto::time::parse_xml_datetime;
use vellum_crypto::{Certificate, Crl, OcspResponse, RevocationValues, TimeStampToken};
use vellum_dsig::signature::signed_element;
use vellum_dsig::EmbeddedSignature;
use vellum_xml::node::{decode_base64, find_child_element, find_child_elements, find_path, is_element, text_content};

/// `SigningCertificate/Cert`: a digest of the signer certificate plus its
/// issuer and serial number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertReference {
    pub digest_method: String,
    pub digest_value: Vec<u8>,
    pub issuer_name: Option<String>,
    /// Decimal, as written in `X509SerialNumber`.
    pub serial_number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStampKind {
    /// `SignatureTimeStamp`, over the signature value.
    Signature,
    /// `SigAndRefsTimeStamp`, over the signature and validation references.
    SigAndRefs,
}

/// One `EncapsulatedTimeStamp` with the TSA evidence that follows it.
#[derive(Debug, Clone)]
pub struct TimeStamp {
    pub kind: TimeStampKind,
    pub token: TimeStampToken,
    /// Certificates of the XAdES 1.4.1 `TimeStampValidationData` sibling.
    pub validation_certificates: Vec<Certificate>,
    /// Revocation values of the `TimeStampValidationData` sibling.
    pub validation_revocation: RevocationValues,
}

/// Decoded XAdES properties; every field is optional.
#[derive(Debug, Clone, Default)]
pub struct QualifyingProperties {
    pub signing_time: Option<DateTime<Utc>>,
    pub signing_certificates: Vec<CertReference>,
    pub claimed_role: Option<String>,
    pub timestamps: Vec<TimeStamp>,
    pub certificate_values: Vec<Certificate>,
    pub revocation_values: RevocationValues,
}

impl QualifyingProperties {
    /// Extract the properties of `signature` from its `ds:Signature` node.
    ///
    /// Signed properties are read from the one `xades:SignedProperties`
    /// element the SignedInfo reference of type `SignedProperties` resolves
    /// to; unsigned properties from its `xades:QualifyingProperties` parent.
    /// When no XAdES signing time is found, the OOXML `mdssi:SignatureTime`
    /// property of a signed `ds:Object` is used.
    pub fn extract(signature_node: Node<'_, '_>, signature: &EmbeddedSignature) -> Self {
        let mut props = match find_signed_properties(signature_node, signature) {
            Some((sp, qp)) => Self::from_element(sp, qp),
            None => Self::default(),
        };
        if props.signing_time.is_none() {
            props.signing_time = ooxml_signature_time(signature_node, signature);
        }
        props
    }

    fn from_element(signed_properties: Node<'_, '_>, qualifying_properties: Node<'_, '_>) -> Self {
        let mut props = Self::default();

        if let Some(ssp) =
            find_child_element(signed_properties, ns::XADES, ns::node::SIGNED_SIGNATURE_PROPERTIES)
        {
            props.signing_time = find_child_element(ssp, ns::XADES, ns::node::SIGNING_TIME)
                .and_then(text_content)
                .and_then(|text| degrade("SigningTime", parse_xml_datetime(&text)));

            props.signing_certificates = find_path(
                ssp,
                &[(ns::XADES, ns::node::SIGNING_CERTIFICATE)],
            )
            .map(|sc| {
                find_child_elements(sc, ns::XADES, ns::node::CERT)
                    .into_iter()
                    .filter_map(|cert| degrade("SigningCertificate/Cert", parse_cert_reference(cert)))
                    .collect()
            })
            .unwrap_or_default();

            props.claimed_role = find_path(
                ssp,
                &[
                    (ns::XADES, ns::node::SIGNER_ROLE),
                    (ns::XADES, ns::node::CLAIMED_ROLES),
                    (ns::XADES, ns::node::CLAIMED_ROLE),
                ],
            )
            .and_then(text_content);
        }

        if let Some(usp) = find_path(
            qualifying_properties,
            &[
                (ns::XADES, ns::node::UNSIGNED_PROPERTIES),
                (ns::XADES, ns::node::UNSIGNED_SIGNATURE_PROPERTIES),
            ],
        ) {
            for property in usp.children().filter(Node::is_element) {
                if is_element(property, ns::XADES, ns::node::SIGNATURE_TIME_STAMP) {
                    props.push_timestamps(property, TimeStampKind::Signature);
                } else if is_element(property, ns::XADES, ns::node::SIG_AND_REFS_TIME_STAMP) {
                    props.push_timestamps(property, TimeStampKind::SigAndRefs);
                } else if is_element(property, ns::XADES, ns::node::CERTIFICATE_VALUES) {
                    props.certificate_values.extend(parse_certificate_values(property));
                } else if is_element(property, ns::XADES, ns::node::REVOCATION_VALUES) {
                    let values = parse_revocation_values(property);
                    props.revocation_values.crls.extend(values.crls);
                    props.revocation_values.ocsp_responses.extend(values.ocsp_responses);
                }
            }
        }

        debug!(
            signing_time = ?props.signing_time,
            timestamps = props.timestamps.len(),
            certificate_values = props.certificate_values.len(),
            "extracted qualifying properties"
        );
        props
    }

    fn push_timestamps(&mut self, property: Node<'_, '_>, kind: TimeStampKind) {
        let validation_data = next_element_sibling(property)
            .filter(|n| is_element(*n, ns::XADES141, ns::node::TIME_STAMP_VALIDATION_DATA));
        let (validation_certificates, validation_revocation) = match validation_data {
            Some(tsvd) => (
                find_child_element(tsvd, ns::XADES, ns::node::CERTIFICATE_VALUES)
                    .map(parse_certificate_values)
                    .unwrap_or_default(),
                find_child_element(tsvd, ns::XADES, ns::node::REVOCATION_VALUES)
                    .map(parse_revocation_values)
                    .unwrap_or_default(),
            ),
            None => Default::default(),
        };

        let encapsulated = find_child_elements(property, ns::XADES, ns::node::ENCAPSULATED_TIME_STAMP);
        if encapsulated.is_empty() {
            warn!(property = property.tag_name().name(), "time-stamp property without token");
        }
        for node in encapsulated {
            let token = decode_base64(node).and_then(|der| TimeStampToken::from_der(&der));
            if let Some(token) = degrade("EncapsulatedTimeStamp", token) {
                self.timestamps.push(TimeStamp {
                    kind,
                    token,
                    validation_certificates: validation_certificates.clone(),
                    validation_revocation: validation_revocation.clone(),
                });
            }
        }
    }

    pub fn signature_timestamps(&self) -> impl Iterator<Item = &TimeStamp> {
        self.timestamps
            .iter()
            .filter(|ts| ts.kind == TimeStampKind::Signature)
    }

    /// Earliest generation time of the `SignatureTimeStamp` tokens.
    pub fn earliest_signature_timestamp(&self) -> Option<DateTime<Utc>> {
        self.signature_timestamps().map(|ts| ts.token.gen_time()).min()
    }
}

/// The referenced `SignedProperties` element and its `QualifyingProperties`
/// parent.
fn find_signed_properties<'a, 'input>(
    signature_node: Node<'a, 'input>,
    signature: &EmbeddedSignature,
) -> Option<(Node<'a, 'input>, Node<'a, 'input>)> {
    let Some(reference) = signature.reference_of_type(algorithm::XADES_SIGNED_PROPERTIES) else {
        debug!(signature = %signature.label(), "no XAdES SignedProperties reference");
        return None;
    };
    let found = signed_element(signature_node, reference)
        .filter(|sp| is_element(*sp, ns::XADES, ns::node::SIGNED_PROPERTIES))
        .and_then(|sp| {
            sp.parent_element()
                .filter(|qp| is_element(*qp, ns::XADES, ns::node::QUALIFYING_PROPERTIES))
                .map(|qp| (sp, qp))
        });
    if found.is_none() {
        warn!(signature = %signature.label(), uri = %reference.uri, "SignedProperties reference target not found");
    }
    found
}

fn parse_cert_reference(cert: Node<'_, '_>) -> Result<CertReference, Error> {
    let cert_digest = find_child_element(cert, ns::XADES, ns::node::CERT_DIGEST)
        .ok_or_else(|| Error::MissingElement("CertDigest".into()))?;
    let digest_method = find_child_element(cert_digest, ns::DSIG, ns::node::DIGEST_METHOD)
        .and_then(|n| n.attribute(ns::attr::ALGORITHM))
        .ok_or_else(|| Error::MissingAttribute("Algorithm on CertDigest/DigestMethod".into()))?
        .to_owned();
    let digest_value = find_child_element(cert_digest, ns::DSIG, ns::node::DIGEST_VALUE)
        .ok_or_else(|| Error::MissingElement("CertDigest/DigestValue".into()))
        .and_then(decode_base64)?;

    let issuer_serial = find_child_element(cert, ns::XADES, ns::node::ISSUER_SERIAL);
    let child_text = |local: &str| {
        issuer_serial
            .and_then(|is| find_child_element(is, ns::DSIG, local))
            .and_then(text_content)
    };
    Ok(CertReference {
        digest_method,
        digest_value,
        issuer_name: child_text(ns::node::X509_ISSUER_NAME),
        serial_number: child_text(ns::node::X509_SERIAL_NUMBER),
    })
}

fn parse_certificate_values(node: Node<'_, '_>) -> Vec<Certificate> {
    find_child_elements(node, ns::XADES, ns::node::ENCAPSULATED_X509_CERTIFICATE)
        .into_iter()
        .filter_map(|n| {
            let cert = decode_base64(n).and_then(|der| Certificate::from_der(&der));
            degrade("EncapsulatedX509Certificate", cert)
        })
        .collect()
}

fn parse_revocation_values(node: Node<'_, '_>) -> RevocationValues {
    let crls = find_child_element(node, ns::XADES, ns::node::CRL_VALUES)
        .map(|values| {
            find_child_elements(values, ns::XADES, ns::node::ENCAPSULATED_CRL_VALUE)
                .into_iter()
                .filter_map(|n| {
                    let crl = decode_base64(n).and_then(|der| Crl::from_der(&der));
                    degrade("EncapsulatedCRLValue", crl)
                })
                .collect()
        })
        .unwrap_or_default();
    let ocsp_responses = find_child_element(node, ns::XADES, ns::node::OCSP_VALUES)
        .map(|values| {
            find_child_elements(values, ns::XADES, ns::node::ENCAPSULATED_OCSP_VALUE)
                .into_iter()
                .filter_map(|n| {
                    let ocsp = decode_base64(n).and_then(|der| OcspResponse::from_der(&der));
                    degrade("EncapsulatedOCSPValue", ocsp)
                })
                .collect()
        })
        .unwrap_or_default();
    RevocationValues { crls, ocsp_responses }
}

/// `ds:Object/ds:SignatureProperties/ds:SignatureProperty/mdssi:SignatureTime/mdssi:Value`
/// of an Object SignedInfo references.
fn ooxml_signature_time(signature_node: Node<'_, '_>, signature: &EmbeddedSignature) -> Option<DateTime<Utc>> {
    let value = signature
        .references
        .iter()
        .filter_map(|reference| signed_element(signature_node, reference))
        .filter(|object| is_element(*object, ns::DSIG, ns::node::OBJECT))
        .flat_map(|object| find_child_elements(object, ns::DSIG, ns::node::SIGNATURE_PROPERTIES))
        .flat_map(|props| find_child_elements(props, ns::DSIG, ns::node::SIGNATURE_PROPERTY))
        .find_map(|prop| {
            find_path(
                prop,
                &[
                    (ns::OOXML_DIGSIG, ns::node::SIGNATURE_TIME),
                    (ns::OOXML_DIGSIG, ns::node::VALUE),
                ],
            )
        })
        .and_then(text_content)?;
    debug!(%value, "using OOXML SignatureTime");
    degrade("mdssi:SignatureTime", parse_xml_datetime(&value))
}

fn next_element_sibling<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    node.next_siblings().skip(1).find(Node::is_element)
}

fn degrade<T>(what: &str, result: Result<T, Error>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(property = what, error = %e, "ignoring undecodable property");
            None
        }
    }
}

#![forbid(unsafe_code)]

//! XML namespace constants used across the engine.

/// XML Digital Signature namespace
pub const DSIG: &str = "http://www.w3.org/2000/09/xmldsig#";

/// XAdES 1.3.2 namespace (QualifyingProperties and most properties)
pub const XADES: &str = "http://uri.etsi.org/01903/v1.3.2#";

/// XAdES 1.4.1 namespace (TimeStampValidationData)
pub const XADES141: &str = "http://uri.etsi.org/01903/v1.4.1#";

/// eID identity signature facet namespace
pub const IDENTITY: &str = "be:fedict:eid:identity:1.0";

/// OOXML package relationships namespace
pub const RELATIONSHIPS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// OOXML digital signature namespace (`mdssi:` prefix)
pub const OOXML_DIGSIG: &str = "http://schemas.openxmlformats.org/package/2006/digital-signature";

// ── Element names ────────────────────────────────────────────────────

pub mod node {
    // DSig elements
    pub const SIGNATURE: &str = "Signature";
    pub const SIGNED_INFO: &str = "SignedInfo";
    pub const SIGNATURE_METHOD: &str = "SignatureMethod";
    pub const SIGNATURE_VALUE: &str = "SignatureValue";
    pub const REFERENCE: &str = "Reference";
    pub const TRANSFORMS: &str = "Transforms";
    pub const TRANSFORM: &str = "Transform";
    pub const DIGEST_METHOD: &str = "DigestMethod";
    pub const DIGEST_VALUE: &str = "DigestValue";
    pub const OBJECT: &str = "Object";
    pub const MANIFEST: &str = "Manifest";
    pub const SIGNATURE_PROPERTIES: &str = "SignatureProperties";
    pub const SIGNATURE_PROPERTY: &str = "SignatureProperty";

    // KeyInfo elements
    pub const KEY_INFO: &str = "KeyInfo";
    pub const X509_DATA: &str = "X509Data";
    pub const X509_CERTIFICATE: &str = "X509Certificate";
    pub const X509_ISSUER_SERIAL: &str = "X509IssuerSerial";
    pub const X509_ISSUER_NAME: &str = "X509IssuerName";
    pub const X509_SERIAL_NUMBER: &str = "X509SerialNumber";

    // XAdES elements
    pub const QUALIFYING_PROPERTIES: &str = "QualifyingProperties";
    pub const SIGNED_PROPERTIES: &str = "SignedProperties";
    pub const SIGNED_SIGNATURE_PROPERTIES: &str = "SignedSignatureProperties";
    pub const SIGNING_TIME: &str = "SigningTime";
    pub const SIGNING_CERTIFICATE: &str = "SigningCertificate";
    pub const CERT: &str = "Cert";
    pub const CERT_DIGEST: &str = "CertDigest";
    pub const ISSUER_SERIAL: &str = "IssuerSerial";
    pub const SIGNER_ROLE: &str = "SignerRole";
    pub const CLAIMED_ROLES: &str = "ClaimedRoles";
    pub const CLAIMED_ROLE: &str = "ClaimedRole";
    pub const UNSIGNED_PROPERTIES: &str = "UnsignedProperties";
    pub const UNSIGNED_SIGNATURE_PROPERTIES: &str = "UnsignedSignatureProperties";
    pub const SIGNATURE_TIME_STAMP: &str = "SignatureTimeStamp";
    pub const SIG_AND_REFS_TIME_STAMP: &str = "SigAndRefsTimeStamp";
    pub const ENCAPSULATED_TIME_STAMP: &str = "EncapsulatedTimeStamp";
    pub const CERTIFICATE_VALUES: &str = "CertificateValues";
    pub const ENCAPSULATED_X509_CERTIFICATE: &str = "EncapsulatedX509Certificate";
    pub const REVOCATION_VALUES: &str = "RevocationValues";
    pub const CRL_VALUES: &str = "CRLValues";
    pub const ENCAPSULATED_CRL_VALUE: &str = "EncapsulatedCRLValue";
    pub const OCSP_VALUES: &str = "OCSPValues";
    pub const ENCAPSULATED_OCSP_VALUE: &str = "EncapsulatedOCSPValue";
    pub const TIME_STAMP_VALIDATION_DATA: &str = "TimeStampValidationData";

    // Identity facet elements
    pub const IDENTITY: &str = "Identity";
    pub const NAME: &str = "Name";
    pub const FIRST_NAME: &str = "FirstName";
    pub const MIDDLE_NAME: &str = "MiddleName";
    pub const GENDER: &str = "Gender";
    pub const PHOTO: &str = "Photo";

    // OOXML package elements
    pub const RELATIONSHIP: &str = "Relationship";
    pub const SIGNATURE_TIME: &str = "SignatureTime";
    pub const VALUE: &str = "Value";
}

// ── Attribute names ──────────────────────────────────────────────────

pub mod attr {
    pub const ID: &str = "Id";
    pub const URI: &str = "URI";
    pub const TYPE: &str = "Type";
    pub const ALGORITHM: &str = "Algorithm";
    pub const TARGET: &str = "Target";
    pub const TARGET_MODE: &str = "TargetMode";
    pub const MIME_TYPE: &str = "MimeType";
}

#![forbid(unsafe_code)]

//! Algorithm and type URI constants.

// ── Digest algorithms ────────────────────────────────────────────────

pub const SHA1: &str = "http://www.w3.org/2000/09/xmldsig#sha1";
pub const SHA224: &str = "http://www.w3.org/2001/04/xmldsig-more#sha224";
pub const SHA256: &str = "http://www.w3.org/2001/04/xmlenc#sha256";
pub const SHA384: &str = "http://www.w3.org/2001/04/xmldsig-more#sha384";
pub const SHA512: &str = "http://www.w3.org/2001/04/xmlenc#sha512";
pub const SHA3_224: &str = "http://www.w3.org/2007/05/xmldsig-more#sha3-224";
pub const SHA3_256: &str = "http://www.w3.org/2007/05/xmldsig-more#sha3-256";
pub const SHA3_384: &str = "http://www.w3.org/2007/05/xmldsig-more#sha3-384";
pub const SHA3_512: &str = "http://www.w3.org/2007/05/xmldsig-more#sha3-512";

// ── Transforms ───────────────────────────────────────────────────────

pub const ENVELOPED_SIGNATURE: &str = "http://www.w3.org/2000/09/xmldsig#enveloped-signature";
pub const RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/package/2006/RelationshipTransform";

// ── Reference types ──────────────────────────────────────────────────

/// Reference pointing at the XAdES SignedProperties element.
pub const XADES_SIGNED_PROPERTIES: &str = "http://uri.etsi.org/01903#SignedProperties";

/// Reference pointing at a `ds:Object` (OOXML package object, ODF/XAdES objects).
pub const DSIG_OBJECT: &str = "http://www.w3.org/2000/09/xmldsig#Object";

/// Reference pointing at a `ds:Manifest`.
pub const DSIG_MANIFEST: &str = "http://www.w3.org/2000/09/xmldsig#Manifest";

/// Reference pointing at the eID identity facet object.
pub const IDENTITY_REFERENCE: &str = "be:fedict:eid:identity:1.0";

// ── OOXML relationship types ─────────────────────────────────────────

pub const REL_DIGITAL_SIGNATURE_ORIGIN: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/digital-signature/origin";
pub const REL_DIGITAL_SIGNATURE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/digital-signature/signature";

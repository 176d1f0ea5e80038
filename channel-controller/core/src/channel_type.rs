use std::fmt;

/// Channel types limited to a single instance per namespace.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RestrictedType {
    NamespaceMirror,
    ObjectBucket,
    PackageRepo,
}

/// The cardinality class of a declared channel type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChannelTypeClass {
    Restricted(RestrictedType),
    Unrestricted,
}

/// Classifies a declared channel type.
///
/// Matching is exact and case-sensitive. Every string outside the restricted
/// set, including unrecognized ones, is unrestricted.
pub fn classify(channel_type: &str) -> ChannelTypeClass {
    match RestrictedType::from_type_str(channel_type) {
        Some(restricted) => ChannelTypeClass::Restricted(restricted),
        None => ChannelTypeClass::Unrestricted,
    }
}

// === impl RestrictedType ===

impl RestrictedType {
    pub const ALL: [Self; 3] = [Self::NamespaceMirror, Self::ObjectBucket, Self::PackageRepo];

    pub fn from_type_str(s: &str) -> Option<Self> {
        match s {
            "NamespaceMirror" => Some(Self::NamespaceMirror),
            "ObjectBucket" => Some(Self::ObjectBucket),
            "PackageRepo" => Some(Self::PackageRepo),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NamespaceMirror => "NamespaceMirror",
            Self::ObjectBucket => "ObjectBucket",
            Self::PackageRepo => "PackageRepo",
        }
    }
}

impl fmt::Display for RestrictedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// === impl ChannelTypeClass ===

impl ChannelTypeClass {
    #[inline]
    pub fn is_restricted(&self) -> bool {
        matches!(self, Self::Restricted(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Restricted(_) => "restricted",
            Self::Unrestricted => "unrestricted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("NamespaceMirror", ChannelTypeClass::Restricted(RestrictedType::NamespaceMirror))]
    #[case("ObjectBucket", ChannelTypeClass::Restricted(RestrictedType::ObjectBucket))]
    #[case("PackageRepo", ChannelTypeClass::Restricted(RestrictedType::PackageRepo))]
    #[case("Git", ChannelTypeClass::Unrestricted)]
    #[case("GitHub", ChannelTypeClass::Unrestricted)]
    #[case("namespacemirror", ChannelTypeClass::Unrestricted)]
    #[case("OBJECTBUCKET", ChannelTypeClass::Unrestricted)]
    #[case("PackageRepo ", ChannelTypeClass::Unrestricted)]
    #[case("", ChannelTypeClass::Unrestricted)]
    fn classifies(#[case] channel_type: &str, #[case] expected: ChannelTypeClass) {
        assert_eq!(classify(channel_type), expected);
    }

    #[test]
    fn classification_is_stable() {
        for t in ["NamespaceMirror", "Git", "GitHub", "ObjectBucket", "???"] {
            assert_eq!(classify(t), classify(t));
        }
    }

    #[test]
    fn restricted_names_round_trip() {
        for t in RestrictedType::ALL {
            assert_eq!(RestrictedType::from_type_str(&t.to_string()), Some(t));
            assert!(classify(t.as_str()).is_restricted());
        }
    }
}

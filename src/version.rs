use crate::domain::SemVer;

/// Decomposes a version string into its semantic version fields.
///
/// Tolerates a leading `v`/`V` the way tags are usually written. Strings that
/// are not semantic versions (including the `Unknown` placeholder) yield
/// `None`.
///
/// # Example
/// ```
/// use version_report::version::parse_sem_ver;
///
/// let sv = parse_sem_ver("v1.4.0-beta.2+sha.5114f85").unwrap();
/// assert_eq!((sv.major, sv.minor, sv.patch), (1, 4, 0));
/// assert_eq!(sv.pre_release.as_deref(), Some("beta.2"));
/// assert_eq!(sv.build_metadata.as_deref(), Some("sha.5114f85"));
/// assert!(parse_sem_ver("1.2").is_none());
/// ```
pub fn parse_sem_ver(version: &str) -> Option<SemVer> {
    let clean = version
        .trim()
        .trim_start_matches('v')
        .trim_start_matches('V');

    let parsed = semver::Version::parse(clean).ok()?;

    Some(SemVer {
        major: parsed.major,
        minor: parsed.minor,
        patch: parsed.patch,
        pre_release: (!parsed.pre.is_empty()).then(|| parsed.pre.to_string()),
        build_metadata: (!parsed.build.is_empty()).then(|| parsed.build.to_string()),
    })
}

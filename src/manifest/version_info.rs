//! Windows executable version resource.
//!
//! The bundler embeds `version_info.txt` into the `.exe` as a `VERSIONINFO`
//! block. The text is Python literal syntax read by the bundler, not TOML or
//! JSON.

use distkit_common::{AppIdentity, render_template};

/// File name the version resource is written to.
pub const VERSION_INFO_FILE: &str = "version_info.txt";

const VERSION_INFO_TEMPLATE: &str = r"# UTF-8
VSVersionInfo(
  ffi=FixedFileInfo(
    filevers=({version_tuple}),
    prodvers=({version_tuple}),
    mask=0x3f,
    flags=0x0,
    OS=0x40004,
    fileType=0x1,
    subtype=0x0,
    date=(0, 0)
  ),
  kids=[
    StringFileInfo(
      [
      StringTable(
        u'040904B0',
        [StringStruct(u'CompanyName', u'{display_name}'),
        StringStruct(u'FileDescription', u'{display_name}'),
        StringStruct(u'FileVersion', u'{version_dotted}'),
        StringStruct(u'InternalName', u'{name}'),
        StringStruct(u'LegalCopyright', u'Copyright (c) {display_name}'),
        StringStruct(u'OriginalFilename', u'{name}.exe'),
        StringStruct(u'ProductName', u'{display_name}'),
        StringStruct(u'ProductVersion', u'{version_dotted}')])
      ]),
    VarFileInfo([VarStruct(u'Translation', [1033, 1200])])
  ]
)
";

/// Splits a release version into the four numeric fields of a Windows file
/// version. Missing fields are zero; non-numeric fields (pre-release tags)
/// are truncated to their leading digits.
///
/// # Examples
///
/// ```
/// use distkit::manifest::version_info::windows_version_fields;
///
/// assert_eq!(windows_version_fields("1.0.0"), [1, 0, 0, 0]);
/// assert_eq!(windows_version_fields("2.4.1-rc1"), [2, 4, 1, 0]);
/// ```
#[must_use]
pub fn windows_version_fields(version: &str) -> [u16; 4] {
    let mut fields = [0_u16; 4];
    for (slot, part) in fields.iter_mut().zip(version.trim().split('.')) {
        let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
        *slot = digits.parse().unwrap_or(0);
    }
    fields
}

/// Renders the version resource for `app`.
#[must_use]
pub fn render_version_info(app: &AppIdentity) -> String {
    let fields = windows_version_fields(&app.version);
    let tuple = fields.map(|f| f.to_string()).join(", ");
    let dotted = fields.map(|f| f.to_string()).join(".");

    render_template(
        VERSION_INFO_TEMPLATE,
        &[
            ("version_tuple", &tuple),
            ("version_dotted", &dotted),
            ("display_name", &app.display_name),
            ("name", &app.name),
        ],
    )
}

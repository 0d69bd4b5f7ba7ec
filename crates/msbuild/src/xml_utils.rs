use std::borrow::Cow;
use std::ops::Range;

use quick_xml::events::BytesStart;

/// Byte ranges of one attribute inside the raw content of a start tag.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AttributeSpan {
    key: Range<usize>,
    /// The whole attribute including the whitespace that precedes it.
    span: Range<usize>,
}

/// Scans the raw content of a start tag (`Name attr="value" ...`) for attribute spans.
fn attribute_spans(content: &[u8], name_len: usize) -> Vec<AttributeSpan> {
    let len = content.len();
    let skip_whitespace = |mut i: usize| {
        while i < len && content[i].is_ascii_whitespace() {
            i += 1;
        }
        i
    };

    let mut spans = Vec::new();
    let mut i = name_len.min(len);
    loop {
        let span_start = i;
        i = skip_whitespace(i);
        if i >= len {
            break;
        }
        let key_start = i;
        while i < len && !content[i].is_ascii_whitespace() && content[i] != b'=' {
            i += 1;
        }
        let key = key_start..i;
        let after_key = skip_whitespace(i);
        if after_key < len && content[after_key] == b'=' {
            i = skip_whitespace(after_key + 1);
            match content.get(i) {
                Some(&quote) if quote == b'"' || quote == b'\'' => {
                    i += 1;
                    while i < len && content[i] != quote {
                        i += 1;
                    }
                    i = (i + 1).min(len);
                }
                _ => {
                    while i < len && !content[i].is_ascii_whitespace() {
                        i += 1;
                    }
                }
            }
        }
        if i <= key_start {
            break;
        }
        spans.push(AttributeSpan {
            key,
            span: span_start..i,
        });
    }
    spans
}

/// Returns `tag` without the attribute `name`, or `None` when the tag has no such
/// attribute. Every other byte of the tag, attribute order and quoting included, is kept.
pub(crate) fn remove_attribute(tag: &BytesStart<'_>, name: &str) -> Option<BytesStart<'static>> {
    let content: &[u8] = tag;
    let name_len = tag.name().as_ref().len();
    let span = attribute_spans(content, name_len)
        .into_iter()
        .find(|attribute| &content[attribute.key.clone()] == name.as_bytes())?;

    let mut rewritten = Vec::with_capacity(content.len());
    rewritten.extend_from_slice(&content[..span.span.start]);
    rewritten.extend_from_slice(&content[span.span.end..]);
    Some(BytesStart::from_content(
        String::from_utf8_lossy(&rewritten).into_owned(),
        name_len,
    ))
}

/// Value of the attribute `name` on `tag`, unescaped.
pub(crate) fn attribute_value(tag: &BytesStart<'_>, name: &str) -> Option<String> {
    tag.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == name.as_bytes())
        .and_then(|attr| attr.unescape_value().ok().map(Cow::into_owned))
}

/// Turns `tag` into the content of a self-closing tag written as `<Name attr="..." />`.
pub(crate) fn self_closing(tag: &BytesStart<'_>) -> BytesStart<'static> {
    let content = String::from_utf8_lossy(tag);
    BytesStart::from_content(format!("{} ", content.trim_end()), tag.name().as_ref().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tag(content: &str) -> BytesStart<'static> {
        let name_len = content
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(content.len());
        BytesStart::from_content(content.to_string(), name_len)
    }

    fn text(tag: &BytesStart<'_>) -> String {
        String::from_utf8_lossy(tag).into_owned()
    }

    #[rstest]
    #[case(
        r#"PackageReference Include="Contoso.Utility.UsefulStuff" Version="17.9.0" "#,
        r#"PackageReference Include="Contoso.Utility.UsefulStuff" "#
    )]
    #[case(
        r#"PackageReference Include="A" Version="3.6.0" Condition="'$(TargetFramework)' == 'net452'""#,
        r#"PackageReference Include="A" Condition="'$(TargetFramework)' == 'net452'""#
    )]
    #[case(
        r#"PackageReference Version="1.0" Include="A""#,
        r#"PackageReference Include="A""#
    )]
    #[case(
        "PackageReference\n      Include=\"A\"\n      Version = '1.0'\n      PrivateAssets=\"all\"",
        "PackageReference\n      Include=\"A\"\n      PrivateAssets=\"all\""
    )]
    #[case(
        r#"PackageReference Include="A" VersionOverride="2.0" Version="1.0""#,
        r#"PackageReference Include="A" VersionOverride="2.0""#
    )]
    fn test_remove_attribute(#[case] input: &str, #[case] expected: &str) {
        let removed = remove_attribute(&tag(input), "Version").unwrap();
        assert_eq!(text(&removed), expected);
        assert_eq!(removed.name().as_ref(), b"PackageReference");
    }

    #[rstest]
    #[case(r#"PackageReference Include="A""#)]
    #[case(r#"PackageReference Include="A" VersionOverride="2.0""#)]
    #[case(r#"PackageReference Include="Version""#)]
    #[case("PackageReference")]
    fn test_remove_attribute_missing(#[case] input: &str) {
        assert!(remove_attribute(&tag(input), "Version").is_none());
    }

    #[test]
    fn test_attribute_value() {
        let tag = tag(r#"PackageReference Include="Fish &amp; Chips" Version='1.0'"#);
        assert_eq!(
            attribute_value(&tag, "Include").as_deref(),
            Some("Fish & Chips")
        );
        assert_eq!(attribute_value(&tag, "Version").as_deref(), Some("1.0"));
        assert_eq!(attribute_value(&tag, "Condition"), None);
    }

    #[rstest]
    #[case(r#"PackageReference Include="A""#, r#"PackageReference Include="A" "#)]
    #[case("PackageReference Include=\"A\"\n  ", r#"PackageReference Include="A" "#)]
    #[case("PackageReference", "PackageReference ")]
    fn test_self_closing(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(text(&self_closing(&tag(input))), expected);
    }
}

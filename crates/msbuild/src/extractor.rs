use cpm_core::PackageDeclaration;
use tracing::{debug, info, warn};

use crate::document::{Element, ProjectDocument};
use crate::xml_utils::attribute_value;
use crate::{INCLUDE_ATTRIBUTE, PACKAGE_REFERENCE_ELEMENT, VERSION_ELEMENT};

/// Extracts every `PackageReference` declaration of a project, in document order.
///
/// The version comes from the `Version` attribute or, when that is absent or empty, from
/// a `<Version>` child element. References without an `Include` id or without any
/// version are skipped. Duplicates are kept.
#[must_use]
pub fn extract(document: &ProjectDocument) -> Vec<PackageDeclaration> {
    debug!("Checking for PackageReferences");
    let references = document.elements_named(PACKAGE_REFERENCE_ELEMENT);
    info!(count = references.len(), "Found PackageReferences");

    references
        .iter()
        .filter_map(|reference| read_declaration(document, reference))
        .collect()
}

fn read_declaration(
    document: &ProjectDocument,
    reference: &Element,
) -> Option<PackageDeclaration> {
    let Some(id) = non_empty_attribute(reference, INCLUDE_ATTRIBUTE) else {
        warn!("Found PackageReference without an Include attribute");
        return None;
    };

    let version = match non_empty_attribute(reference, VERSION_ELEMENT) {
        Some(version) => Some(version),
        None => {
            debug!(package = %id, "No Version attribute found");
            document
                .child_element(reference, VERSION_ELEMENT)
                .map(|child| document.inner_text(&child).trim().to_string())
                .filter(|version| !version.is_empty())
        }
    };
    let Some(version) = version else {
        warn!(package = %id, "No Version attribute or Version child element");
        return None;
    };

    debug!(package = %id, version = %version, "Found NuGet package");
    Some(PackageDeclaration::new(id, version))
}

fn non_empty_attribute(reference: &Element, name: &str) -> Option<String> {
    attribute_value(&reference.tag, name).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn extract_from(content: &str) -> Vec<PackageDeclaration> {
        extract(&ProjectDocument::parse(content).unwrap())
    }

    #[test]
    fn test_no_package_references() {
        let packages = extract_from(
            r#"<Project Sdk="Microsoft.NET.Sdk">

</Project>"#,
        );
        assert!(packages.is_empty());
    }

    #[rstest]
    #[case("17.9.0")]
    #[case("3.6.*")]
    #[case("3.6.0-beta.*")]
    #[case("6.*")]
    #[case("(4.1.3,)")]
    #[case("(,5.0)")]
    #[case("[1,3)")]
    #[case("[1.3.2,1.5)")]
    fn test_version_attribute(#[case] version: &str) {
        let packages = extract_from(&format!(
            r#"<Project Sdk="Microsoft.NET.Sdk">

  <ItemGroup>
    <PackageReference Include="Contoso.Utility.UsefulStuff" Version="{version}" />
  </ItemGroup>

</Project>"#
        ));

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].id(), "Contoso.Utility.UsefulStuff");
        assert_eq!(packages[0].version(), version);
    }

    #[test]
    fn test_version_child_element() {
        let packages = extract_from(
            r#"<Project Sdk="Microsoft.NET.Sdk">

  <ItemGroup>
    <PackageReference Include="Contoso.Utility.UsefulStuff">
      <Version>1.37.3</Version>
    </PackageReference>
  </ItemGroup>

</Project>"#,
        );

        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].id(), "Contoso.Utility.UsefulStuff");
        assert_eq!(packages[0].version(), "1.37.3");
    }

    #[test]
    fn test_version_child_element_with_other_children() {
        let packages = extract_from(
            r#"<Project Sdk="Microsoft.NET.Sdk">

  <ItemGroup>
    <PackageReference Include="Contoso.Utility.UsefulStuff">
      <Version>1.37.3</Version>
      <ExcludeAssets>compile</ExcludeAssets>
    </PackageReference>
  </ItemGroup>

</Project>"#,
        );

        let expected = PackageDeclaration::new("Contoso.Utility.UsefulStuff", "1.37.3");
        assert_eq!(packages, vec![expected]);
    }

    #[test]
    fn test_attribute_and_child_forms_agree() {
        let attribute = extract_from(
            r#"<Project><ItemGroup><PackageReference Include="Serilog" Version="3.1.1" /></ItemGroup></Project>"#,
        );
        let child = extract_from(
            r#"<Project><ItemGroup><PackageReference Include="Serilog"><Version>3.1.1</Version></PackageReference></ItemGroup></Project>"#,
        );
        assert_eq!(attribute, child);
        assert_eq!(attribute[0].id(), child[0].id());
    }

    #[test]
    fn test_empty_version_attribute_falls_back_to_child() {
        let packages = extract_from(
            r#"<Project><ItemGroup><PackageReference Include="Serilog" Version=""><Version>2.0.0</Version></PackageReference></ItemGroup></Project>"#,
        );
        assert_eq!(packages[0].version(), "2.0.0");
    }

    #[test]
    fn test_skips_incomplete_references() {
        let packages = extract_from(
            r#"<Project>
  <ItemGroup>
    <PackageReference Version="1.0.0" />
    <PackageReference Include="" Version="1.0.0" />
    <PackageReference Include="NoVersion" />
    <PackageReference Include="EmptyChild"><Version>  </Version></PackageReference>
    <PackageReference Include="Kept" Version="2.0.0" />
  </ItemGroup>
</Project>"#,
        );
        assert_eq!(packages, vec![PackageDeclaration::new("Kept", "2.0.0")]);
    }

    #[test]
    fn test_keeps_document_order_and_duplicates() {
        let packages = extract_from(
            r#"<Project>
  <ItemGroup>
    <PackageReference Include="Zeta" Version="1.0.0" />
    <PackageReference Include="Alpha" Version="2.0.0" />
  </ItemGroup>
  <ItemGroup Condition="'$(TargetFramework)' == 'net48'">
    <PackageReference Include="Zeta" Version="0.9.0" />
  </ItemGroup>
</Project>"#,
        );
        let found = packages
            .iter()
            .map(|p| (p.id(), p.version()))
            .collect::<Vec<_>>();
        assert_eq!(
            found,
            vec![("Zeta", "1.0.0"), ("Alpha", "2.0.0"), ("Zeta", "0.9.0")]
        );
    }

    #[test]
    fn test_ignores_other_items() {
        let packages = extract_from(
            r#"<Project>
  <ItemGroup>
    <ProjectReference Include="..\Core\Core.csproj" />
    <PackageVersion Include="Moq" Version="4.20.0" />
  </ItemGroup>
</Project>"#,
        );
        assert!(packages.is_empty());
    }

    #[test]
    fn test_does_not_modify_document() {
        let content = r#"<Project><ItemGroup><PackageReference Include="A" Version="1.0" /></ItemGroup></Project>"#;
        let document = ProjectDocument::parse(content).unwrap();
        let before = document.clone();
        let _ = extract(&document);
        assert_eq!(document, before);
        assert_eq!(document.to_xml().unwrap(), content);
    }
}

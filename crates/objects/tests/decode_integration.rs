//! 문서 디코딩 통합 테스트
//!
//! XML 문서 -> SourceNode -> 레지스트리 조회 -> 레코드 디코딩 전체 경로를 검증합니다.

use std::path::PathBuf;

use qapi_objects::{
    AssetGroup, Cvss, Decoded, DecoderConfig, DocumentDecoder, DocumentDecoderBuilder, Map,
    ObjectError, Record, RecordKind, ReportTemplate, Scan, SimpleReturnResponse, SourceNode,
    Vulnerability,
};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
}

fn decoder() -> DocumentDecoder {
    DocumentDecoderBuilder::new().build().unwrap()
}

fn decode<T>(name: &str) -> T
where
    T: TryFrom<qapi_objects::AnyRecord, Error = qapi_objects::AnyRecord>,
{
    match decoder().decode_str(&fixture(name)).unwrap() {
        Decoded::Record(record) => T::try_from(record).unwrap(),
        Decoded::Raw(node) => panic!("{name} decoded as raw <{}>", node.tag()),
    }
}

#[test]
fn test_knowledge_base_vulnerability() {
    let vuln: Vulnerability = decode("vuln.xml");

    assert_eq!(vuln.key().unwrap(), "38170");
    assert_eq!(vuln.severity(), Some(4));
    assert_eq!(
        vuln.title,
        "SSL Certificate - Signature Verification Failed Vulnerability"
    );
    assert!(vuln.published_at().is_some());

    // PATCHABLE=0 은 false, PCI_FLAG=1 과 DISCOVERY/REMOTE=1 은 true
    assert!(!vuln.patch_available);
    assert!(vuln.pci_must_fix);
    assert!(vuln.remote_detectable);

    assert_eq!(vuln.cve_ids(), vec!["CVE-2008-5077", "CVE-2009-0025"]);
    assert_eq!(vuln.bugtraqs.len(), 2);
    assert_eq!(vuln.bugtraqs[1].id, "33151");
    assert_eq!(vuln.vendor_references[0].id, "RHSA-2024:0001");
    assert_eq!(vuln.software[0].product, "openssl");
    assert_eq!(vuln.compliance[0].compliance_type, "PCI");
    assert_eq!(
        vuln.pci_reasons,
        vec!["Certificate verification failure", "Severity level 4"]
    );
    assert_eq!(vuln.auth_types, vec!["Windows", "Unix"]);

    let cvss = &vuln.cvss;
    assert_eq!(cvss.base, "5.8");
    assert_eq!(cvss.access.vector, "Network");
    assert_eq!(cvss.impact.availability, "None");

    let exploits: Vec<_> = vuln.exploits().collect();
    assert_eq!(exploits.len(), 1);
    assert_eq!(exploits[0].reference, "CVE-2008-5077");
    assert_eq!(vuln.exploit_sources[0].name, "The Exploit-DB");
    assert_eq!(vuln.malware_sources[0].malware[0].mw_id, "TROJ_SSLBYPASS");
    assert_eq!(vuln.malware_sources[0].malware[0].platform, "Windows");
}

#[test]
fn test_patchable_zero_without_cvss() {
    let xml = "<VULN><QID>105</QID><PATCHABLE>0</PATCHABLE></VULN>";
    let vuln: Vulnerability = decoder().decode_as(xml).unwrap();

    assert!(!vuln.patch_available);
    // CVSS 가 없어도 빈 중첩 레코드로 채워짐
    assert_eq!(vuln.cvss, Cvss::default());
    // 문서에 없는 플래그는 true
    assert!(vuln.pci_must_fix);
    assert!(vuln.remote_detectable);
}

#[test]
fn test_map_report() {
    let map: Map = decode("map_report.xml");

    assert_eq!(map.name, "Corporate perimeter map");
    assert_eq!(map.key().unwrap(), "map/1236282948.44461");
    assert_eq!(map.domain.as_deref(), Some("corp.example.com"));
    assert_eq!(map.option_profiles.len(), 2);
    assert_eq!(
        map.default_option_profile().map(|p| p.title.as_str()),
        Some("Initial Options")
    );
    assert_eq!(
        map.to_string(),
        "<Map name='Corporate perimeter map' date='2024-03-05T19:55:48Z' ref='map/1236282948.44461' />"
    );
}

#[test]
fn test_scan_document() {
    let scan: Scan = decode("scan.xml");

    assert_eq!(scan.key().unwrap(), "scan/1391604450.33452");
    assert_eq!(scan.targets(), vec!["10.0.0.1", "10.0.0.2-10.0.0.9"]);
    assert_eq!(scan.option_profile, "Initial Options");
    assert_eq!(scan.asset_groups, vec!["DMZ"]);
    assert!(!scan.is_processed());
    assert!(scan.can_pause());
    assert!(scan.can_cancel());
    assert!(!scan.can_resume());
}

#[test]
fn test_command_response() {
    let response: SimpleReturnResponse = decode("response.xml");

    assert!(response.was_successful());
    assert_eq!(response.item_keys(), vec!["ID", "REFERENCE"]);
    assert_eq!(
        response.item_value("REFERENCE"),
        Some("scan/1717243200.12345")
    );
}

#[test]
fn test_report_template_with_user() {
    let template: ReportTemplate = decode("report_template.xml");

    assert_eq!(template.key().unwrap(), "1528888");
    assert!(template.is_global());
    assert!(!template.is_default());
    let user = template.user.as_ref().expect("USER should be decoded");
    assert_eq!(user.key().unwrap(), "acme_as");
    assert_eq!(user.full_name(), "Ada Lovelace");
}

#[test]
fn test_asset_group_lists() {
    let group: AssetGroup = decode("asset_group.xml");

    assert_eq!(group.title, "Web Servers");
    assert_eq!(group.scan_ips, vec!["10.1.0.10", "10.1.0.20-10.1.0.30"]);
    assert_eq!(group.scan_dns, vec!["www.example.com"]);
    assert_eq!(group.scanner_appliances, vec!["scanner-east"]);
    assert!(group.last_updated_at().is_some());
}

#[test]
fn test_counts_across_documents() {
    let decoder = decoder();
    for name in ["vuln.xml", "scan.xml", "response.xml"] {
        decoder.decode_str(&fixture(name)).unwrap();
    }
    decoder
        .decode_str("<MAP_RESULT><IP>10.0.0.1</IP></MAP_RESULT>")
        .unwrap();

    assert_eq!(decoder.decoded_count(), 3);
    assert_eq!(decoder.raw_count(), 1);
}

#[test]
fn test_nested_failure_reports_root_identity() {
    let xml = r#"
        <VULN>
          <QID>9000</QID>
          <CORRELATION>
            <EXPLOITS>
              <EXPLT_SRC><EXPLT_LIST /></EXPLT_SRC>
            </EXPLOITS>
          </CORRELATION>
        </VULN>"#;
    let err = decoder().decode_str(xml).unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("<VULN> (QID=9000)"), "message: {msg}");
    match err.root_cause() {
        ObjectError::MalformedDocument { tag, reason } => {
            assert_eq!(tag, "EXPLT_SRC");
            assert!(reason.contains("SRC_NAME"));
        }
        other => panic!("unexpected root cause: {other:?}"),
    }
}

#[test]
fn test_registry_override_from_builder() {
    let decoder = DocumentDecoderBuilder::new()
        .register("MAP_RESULT", RecordKind::Map)
        .build()
        .unwrap();
    let decoded = decoder
        .decode_str(r#"<MAP_RESULT ref="map/2"><TITLE>Result</TITLE></MAP_RESULT>"#)
        .unwrap();

    let map = Map::try_from(decoded.into_record().unwrap()).unwrap();
    assert_eq!(map.key().unwrap(), "map/2");
}

#[test]
fn test_config_limits_apply() {
    let config = DecoderConfig {
        max_depth: 2,
        ..DecoderConfig::default()
    };
    let decoder = DocumentDecoderBuilder::new().config(config).build().unwrap();

    let err = decoder.decode_str(&fixture("vuln.xml")).unwrap_err();
    assert!(matches!(err, ObjectError::DepthExceeded { max: 2 }));
}

#[test]
fn test_pre_parsed_node() {
    let node = SourceNode::new("USER")
        .with_text_child("LOGIN", "jdoe")
        .with_text_child("FIRSTNAME", "Jane");
    let record = decoder().decode_node(node).unwrap().into_record().unwrap();

    assert_eq!(record.kind(), RecordKind::QualysUser);
    assert_eq!(record.key().unwrap(), "jdoe");
}

//! 지식 베이스 취약점 레코드
//!
//! `<VULN>` 문서 하나는 [`Vulnerability`] 하나로 디코딩됩니다. 모든 디렉티브
//! 종류를 사용하는 레코드입니다.
//!
//! - 스칼라: QID, 제목, 분류, 진단/영향/조치 문구
//! - 인버티드 불리언: `PATCHABLE`, `PCI_FLAG`, `DISCOVERY/REMOTE`
//! - 중첩 객체: `CVSS` (내부에 `ACCESS`, `IMPACT`)
//! - 인라인 목록: `CVE_LIST/CVE`, `VENDOR_REFERENCE_LIST/VENDOR_REFERENCE` 등
//! - 질의 목록: `BUGTRAQ_LIST/BUGTRAQ`, `CORRELATION` 아래 익스플로잇/악성코드 출처
//! - 그룹: `DISCOVERY`는 원격 탐지 여부와 인증 방식 목록을 취약점에 직접 기록

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ObjectError;
use crate::record::{require, Record};
use crate::records::common::{default_true, parse_datetime};
use crate::registry::RecordKind;
use crate::schema::{record_fields, FieldValue, ParamMap};
use crate::source::SourceNode;

// =============================================================================
// Vulnerability
// =============================================================================

record_fields! {
    /// [`Vulnerability`] 필드
    pub enum VulnerabilityField {
        Qid => "qid",
        VulnType => "vuln_type",
        SeverityLevel => "severity_level",
        Title => "title",
        Category => "category",
        LastCustomization => "last_customization",
        LastServiceModification => "last_service_modification",
        Published => "published",
        PatchAvailable => "patch_available",
        PciMustFix => "pci_must_fix",
        Diagnosis => "diagnosis",
        DiagnosisComment => "diagnosis_comment",
        Consequence => "consequence",
        ConsequenceComment => "consequence_comment",
        Solution => "solution",
        SolutionComment => "solution_comment",
        Cvss => "cvss",
        Bugtraqs => "bugtraqs",
        Cves => "cves",
        VendorReferences => "vendor_references",
        Software => "software",
        Compliance => "compliance",
        PciReasons => "pci_reasons",
        ExploitSources => "exploit_sources",
        MalwareSources => "malware_sources",
        RemoteDetectable => "remote_detectable",
        AuthTypes => "auth_types",
    }
}

/// 지식 베이스 취약점
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub qid: String,
    #[serde(default)]
    pub vuln_type: String,
    #[serde(default)]
    pub severity_level: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub last_customization: String,
    #[serde(default)]
    pub last_service_modification: String,
    #[serde(default)]
    pub published: String,
    /// 패치 제공 여부. `PATCHABLE`이 정확히 `0`일 때만 `false`
    #[serde(default = "default_true")]
    pub patch_available: bool,
    /// PCI 준수를 위해 반드시 조치해야 하는지 여부
    #[serde(default = "default_true")]
    pub pci_must_fix: bool,
    #[serde(default)]
    pub diagnosis: String,
    #[serde(default)]
    pub diagnosis_comment: String,
    #[serde(default)]
    pub consequence: String,
    #[serde(default)]
    pub consequence_comment: String,
    #[serde(default)]
    pub solution: String,
    #[serde(default)]
    pub solution_comment: String,
    #[serde(default)]
    pub cvss: Cvss,
    #[serde(default)]
    pub bugtraqs: Vec<Bugtraq>,
    #[serde(default)]
    pub cves: Vec<Cve>,
    #[serde(default)]
    pub vendor_references: Vec<VulnVendor>,
    #[serde(default)]
    pub software: Vec<VulnSoftware>,
    #[serde(default)]
    pub compliance: Vec<Compliance>,
    #[serde(default)]
    pub pci_reasons: Vec<String>,
    #[serde(default)]
    pub exploit_sources: Vec<ExploitSource>,
    #[serde(default)]
    pub malware_sources: Vec<MalwareSource>,
    /// 원격 탐지 가능 여부 (`DISCOVERY/REMOTE`)
    #[serde(default = "default_true")]
    pub remote_detectable: bool,
    /// 지원 인증 방식 (`DISCOVERY/AUTH_TYPE_LIST/AUTH_TYPE`)
    #[serde(default)]
    pub auth_types: Vec<String>,
}

impl Default for Vulnerability {
    fn default() -> Self {
        Self {
            qid: String::new(),
            vuln_type: String::new(),
            severity_level: String::new(),
            title: String::new(),
            category: String::new(),
            last_customization: String::new(),
            last_service_modification: String::new(),
            published: String::new(),
            patch_available: true,
            pci_must_fix: true,
            diagnosis: String::new(),
            diagnosis_comment: String::new(),
            consequence: String::new(),
            consequence_comment: String::new(),
            solution: String::new(),
            solution_comment: String::new(),
            cvss: Cvss::default(),
            bugtraqs: Vec::new(),
            cves: Vec::new(),
            vendor_references: Vec::new(),
            software: Vec::new(),
            compliance: Vec::new(),
            pci_reasons: Vec::new(),
            exploit_sources: Vec::new(),
            malware_sources: Vec::new(),
            remote_detectable: true,
            auth_types: Vec::new(),
        }
    }
}

static VULNERABILITY_MAP: LazyLock<ParamMap<VulnerabilityField>> = LazyLock::new(|| {
    use VulnerabilityField as F;

    ParamMap::new()
        .scalar("QID", F::Qid)
        .scalar("VULN_TYPE", F::VulnType)
        .scalar("SEVERITY_LEVEL", F::SeverityLevel)
        .scalar("TITLE", F::Title)
        .scalar("CATEGORY", F::Category)
        .scalar("LAST_CUSTOMIZATION", F::LastCustomization)
        .scalar("LAST_SERVICE_MODIFICATION_DATETIME", F::LastServiceModification)
        .scalar("PUBLISHED_DATETIME", F::Published)
        .flag("PATCHABLE", F::PatchAvailable)
        .flag("PCI_FLAG", F::PciMustFix)
        .scalar("DIAGNOSIS", F::Diagnosis)
        .scalar("DIAGNOSIS_COMMENT", F::DiagnosisComment)
        .scalar("CONSEQUENCE", F::Consequence)
        .scalar("CONSEQUENCE_COMMENT", F::ConsequenceComment)
        .scalar("SOLUTION", F::Solution)
        .scalar("SOLUTION_COMMENT", F::SolutionComment)
        .object("CVSS", F::Cvss, RecordKind::Cvss)
        .query(
            "BUGTRAQ_LIST",
            F::Bugtraqs,
            RecordKind::Bugtraq,
            "BUGTRAQ_LIST/BUGTRAQ",
        )
        .group(
            "CVE_LIST",
            ParamMap::new().inline("CVE", F::Cves, RecordKind::Cve),
        )
        .group(
            "VENDOR_REFERENCE_LIST",
            ParamMap::new().inline("VENDOR_REFERENCE", F::VendorReferences, RecordKind::VulnVendor),
        )
        .group(
            "SOFTWARE_LIST",
            ParamMap::new().inline("SOFTWARE", F::Software, RecordKind::VulnSoftware),
        )
        .group(
            "COMPLIANCE_LIST",
            ParamMap::new().inline("COMPLIANCE", F::Compliance, RecordKind::Compliance),
        )
        .group(
            "PCI_REASONS",
            ParamMap::new().inline("PCI_REASON", F::PciReasons, RecordKind::TextValue),
        )
        .group(
            "CORRELATION",
            ParamMap::new()
                .query(
                    "EXPLOITS",
                    F::ExploitSources,
                    RecordKind::ExploitSource,
                    "EXPLOITS/EXPLT_SRC",
                )
                .query(
                    "MALWARE",
                    F::MalwareSources,
                    RecordKind::MalwareSource,
                    "MALWARE/MW_SRC",
                ),
        )
        .group(
            "DISCOVERY",
            ParamMap::new().flag("REMOTE", F::RemoteDetectable).group(
                "AUTH_TYPE_LIST",
                ParamMap::new().inline("AUTH_TYPE", F::AuthTypes, RecordKind::TextValue),
            ),
        )
});

impl Record for Vulnerability {
    type Field = VulnerabilityField;
    const NAME: &'static str = "Vulnerability";
    const TAG: &'static str = "VULN";

    fn param_map() -> &'static ParamMap<VulnerabilityField> {
        &VULNERABILITY_MAP
    }

    fn assign(&mut self, field: VulnerabilityField, value: FieldValue) -> Result<(), ObjectError> {
        use VulnerabilityField as F;

        match field {
            F::Qid => self.qid = value.into_text::<Self>(field)?,
            F::VulnType => self.vuln_type = value.into_text::<Self>(field)?,
            F::SeverityLevel => self.severity_level = value.into_text::<Self>(field)?,
            F::Title => self.title = value.into_text::<Self>(field)?,
            F::Category => self.category = value.into_text::<Self>(field)?,
            F::LastCustomization => self.last_customization = value.into_text::<Self>(field)?,
            F::LastServiceModification => {
                self.last_service_modification = value.into_text::<Self>(field)?
            }
            F::Published => self.published = value.into_text::<Self>(field)?,
            F::PatchAvailable => self.patch_available = value.into_flag::<Self>(field)?,
            F::PciMustFix => self.pci_must_fix = value.into_flag::<Self>(field)?,
            F::Diagnosis => self.diagnosis = value.into_text::<Self>(field)?,
            F::DiagnosisComment => self.diagnosis_comment = value.into_text::<Self>(field)?,
            F::Consequence => self.consequence = value.into_text::<Self>(field)?,
            F::ConsequenceComment => self.consequence_comment = value.into_text::<Self>(field)?,
            F::Solution => self.solution = value.into_text::<Self>(field)?,
            F::SolutionComment => self.solution_comment = value.into_text::<Self>(field)?,
            F::Cvss => self.cvss = value.into_record::<Self, Cvss>(field)?,
            F::Bugtraqs => self.bugtraqs.extend(value.into_records::<Self, Bugtraq>(field)?),
            F::Cves => self.cves.extend(value.into_records::<Self, Cve>(field)?),
            F::VendorReferences => self
                .vendor_references
                .extend(value.into_records::<Self, VulnVendor>(field)?),
            F::Software => self
                .software
                .extend(value.into_records::<Self, VulnSoftware>(field)?),
            F::Compliance => self
                .compliance
                .extend(value.into_records::<Self, Compliance>(field)?),
            F::PciReasons => self.pci_reasons.extend(value.into_text_list::<Self>(field)?),
            F::ExploitSources => self
                .exploit_sources
                .extend(value.into_records::<Self, ExploitSource>(field)?),
            F::MalwareSources => self
                .malware_sources
                .extend(value.into_records::<Self, MalwareSource>(field)?),
            F::RemoteDetectable => self.remote_detectable = value.into_flag::<Self>(field)?,
            F::AuthTypes => self.auth_types.extend(value.into_text_list::<Self>(field)?),
        }
        Ok(())
    }

    fn finish(&mut self, source: &SourceNode) -> Result<(), ObjectError> {
        require(source.tag(), "QID", &self.qid)
    }

    fn key(&self) -> Result<String, ObjectError> {
        Ok(self.qid.clone())
    }
}

impl Vulnerability {
    /// 심각도 (1-5). 숫자가 아니면 `None`
    pub fn severity(&self) -> Option<u8> {
        self.severity_level.trim().parse().ok()
    }

    /// 공개 시각
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        parse_datetime(&self.published)
    }

    /// 서비스 측 마지막 수정 시각
    pub fn last_modified_at(&self) -> Option<DateTime<Utc>> {
        parse_datetime(&self.last_service_modification)
    }

    /// 알려진 익스플로잇 전체 (출처 순서 유지)
    pub fn exploits(&self) -> impl Iterator<Item = &Exploit> {
        self.exploit_sources.iter().flat_map(|source| source.exploits.iter())
    }

    /// CVE 식별자 목록
    pub fn cve_ids(&self) -> Vec<&str> {
        self.cves.iter().map(|cve| cve.id.as_str()).collect()
    }
}

// =============================================================================
// CVSS
// =============================================================================

record_fields! {
    /// [`Cvss`] 필드
    pub enum CvssField {
        Base => "base",
        Temporal => "temporal",
        Access => "access",
        Impact => "impact",
        Authentication => "authentication",
        Exploitability => "exploitability",
        RemediationLevel => "remediation_level",
        ReportConfidence => "report_confidence",
    }
}

/// CVSS 점수와 벡터 요소
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cvss {
    pub base: String,
    pub temporal: String,
    pub access: CvssAccess,
    pub impact: CvssImpact,
    pub authentication: String,
    pub exploitability: String,
    pub remediation_level: String,
    pub report_confidence: String,
}

static CVSS_MAP: LazyLock<ParamMap<CvssField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("BASE", CvssField::Base)
        .scalar("TEMPORAL", CvssField::Temporal)
        .object("ACCESS", CvssField::Access, RecordKind::CvssAccess)
        .object("IMPACT", CvssField::Impact, RecordKind::CvssImpact)
        .scalar("AUTHENTICATION", CvssField::Authentication)
        .scalar("EXPLOITABILITY", CvssField::Exploitability)
        .scalar("REMEDIATION_LEVEL", CvssField::RemediationLevel)
        .scalar("REPORT_CONFIDENCE", CvssField::ReportConfidence)
});

impl Record for Cvss {
    type Field = CvssField;
    const NAME: &'static str = "Cvss";
    const TAG: &'static str = "CVSS";

    fn param_map() -> &'static ParamMap<CvssField> {
        &CVSS_MAP
    }

    fn assign(&mut self, field: CvssField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            CvssField::Base => self.base = value.into_text::<Self>(field)?,
            CvssField::Temporal => self.temporal = value.into_text::<Self>(field)?,
            CvssField::Access => self.access = value.into_record::<Self, CvssAccess>(field)?,
            CvssField::Impact => self.impact = value.into_record::<Self, CvssImpact>(field)?,
            CvssField::Authentication => self.authentication = value.into_text::<Self>(field)?,
            CvssField::Exploitability => self.exploitability = value.into_text::<Self>(field)?,
            CvssField::RemediationLevel => {
                self.remediation_level = value.into_text::<Self>(field)?
            }
            CvssField::ReportConfidence => {
                self.report_confidence = value.into_text::<Self>(field)?
            }
        }
        Ok(())
    }
}

impl Cvss {
    /// 기본 점수. 숫자가 아니면 `None`
    pub fn base_score(&self) -> Option<f32> {
        self.base.trim().parse().ok()
    }
}

record_fields! {
    /// [`CvssAccess`] 필드
    pub enum CvssAccessField {
        Vector => "vector",
        Complexity => "complexity",
    }
}

/// CVSS 접근 벡터
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvssAccess {
    pub vector: String,
    pub complexity: String,
}

static CVSS_ACCESS_MAP: LazyLock<ParamMap<CvssAccessField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("VECTOR", CvssAccessField::Vector)
        .scalar("COMPLEXITY", CvssAccessField::Complexity)
});

impl Record for CvssAccess {
    type Field = CvssAccessField;
    const NAME: &'static str = "CvssAccess";
    const TAG: &'static str = "ACCESS";

    fn param_map() -> &'static ParamMap<CvssAccessField> {
        &CVSS_ACCESS_MAP
    }

    fn assign(&mut self, field: CvssAccessField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            CvssAccessField::Vector => self.vector = value.into_text::<Self>(field)?,
            CvssAccessField::Complexity => self.complexity = value.into_text::<Self>(field)?,
        }
        Ok(())
    }
}

record_fields! {
    /// [`CvssImpact`] 필드
    pub enum CvssImpactField {
        Confidentiality => "confidentiality",
        Integrity => "integrity",
        Availability => "availability",
    }
}

/// CVSS 영향도
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvssImpact {
    pub confidentiality: String,
    pub integrity: String,
    pub availability: String,
}

static CVSS_IMPACT_MAP: LazyLock<ParamMap<CvssImpactField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("CONFIDENTIALITY", CvssImpactField::Confidentiality)
        .scalar("INTEGRITY", CvssImpactField::Integrity)
        .scalar("AVAILABILITY", CvssImpactField::Availability)
});

impl Record for CvssImpact {
    type Field = CvssImpactField;
    const NAME: &'static str = "CvssImpact";
    const TAG: &'static str = "IMPACT";

    fn param_map() -> &'static ParamMap<CvssImpactField> {
        &CVSS_IMPACT_MAP
    }

    fn assign(&mut self, field: CvssImpactField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            CvssImpactField::Confidentiality => {
                self.confidentiality = value.into_text::<Self>(field)?
            }
            CvssImpactField::Integrity => self.integrity = value.into_text::<Self>(field)?,
            CvssImpactField::Availability => self.availability = value.into_text::<Self>(field)?,
        }
        Ok(())
    }
}

// =============================================================================
// 참조 목록 항목
// =============================================================================

record_fields! {
    /// 식별자/URL 쌍 필드 ([`Cve`], [`Bugtraq`], [`VulnVendor`] 공용)
    pub enum ReferenceField {
        Id => "id",
        Url => "url",
    }
}

static REFERENCE_MAP: LazyLock<ParamMap<ReferenceField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("ID", ReferenceField::Id)
        .scalar("URL", ReferenceField::Url)
});

macro_rules! reference_record {
    ($(#[$meta:meta])* $name:ident, $tag:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(default)]
        pub struct $name {
            pub id: String,
            pub url: String,
        }

        impl Record for $name {
            type Field = ReferenceField;
            const NAME: &'static str = stringify!($name);
            const TAG: &'static str = $tag;

            fn param_map() -> &'static ParamMap<ReferenceField> {
                &REFERENCE_MAP
            }

            fn assign(&mut self, field: ReferenceField, value: FieldValue) -> Result<(), ObjectError> {
                match field {
                    ReferenceField::Id => self.id = value.into_text::<Self>(field)?,
                    ReferenceField::Url => self.url = value.into_text::<Self>(field)?,
                }
                Ok(())
            }

            fn key(&self) -> Result<String, ObjectError> {
                Ok(self.id.clone())
            }
        }
    };
}

reference_record!(
    /// CVE 참조
    Cve,
    "CVE"
);
reference_record!(
    /// Bugtraq 참조
    Bugtraq,
    "BUGTRAQ"
);
reference_record!(
    /// 벤더 권고 참조
    VulnVendor,
    "VENDOR_REFERENCE"
);

record_fields! {
    /// [`VulnSoftware`] 필드
    pub enum VulnSoftwareField {
        Product => "product",
        Vendor => "vendor",
    }
}

/// 영향받는 소프트웨어
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VulnSoftware {
    pub product: String,
    pub vendor: String,
}

static VULN_SOFTWARE_MAP: LazyLock<ParamMap<VulnSoftwareField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("PRODUCT", VulnSoftwareField::Product)
        .scalar("VENDOR", VulnSoftwareField::Vendor)
});

impl Record for VulnSoftware {
    type Field = VulnSoftwareField;
    const NAME: &'static str = "VulnSoftware";
    const TAG: &'static str = "SOFTWARE";

    fn param_map() -> &'static ParamMap<VulnSoftwareField> {
        &VULN_SOFTWARE_MAP
    }

    fn assign(&mut self, field: VulnSoftwareField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            VulnSoftwareField::Product => self.product = value.into_text::<Self>(field)?,
            VulnSoftwareField::Vendor => self.vendor = value.into_text::<Self>(field)?,
        }
        Ok(())
    }
}

record_fields! {
    /// [`Compliance`] 필드
    pub enum ComplianceField {
        ComplianceType => "type",
        Section => "section",
        Description => "description",
    }
}

/// 규정 준수 항목
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Compliance {
    #[serde(rename = "type")]
    pub compliance_type: String,
    pub section: String,
    pub description: String,
}

static COMPLIANCE_MAP: LazyLock<ParamMap<ComplianceField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("TYPE", ComplianceField::ComplianceType)
        .scalar("SECTION", ComplianceField::Section)
        .scalar("DESCRIPTION", ComplianceField::Description)
});

impl Record for Compliance {
    type Field = ComplianceField;
    const NAME: &'static str = "Compliance";
    const TAG: &'static str = "COMPLIANCE";

    fn param_map() -> &'static ParamMap<ComplianceField> {
        &COMPLIANCE_MAP
    }

    fn assign(&mut self, field: ComplianceField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            ComplianceField::ComplianceType => {
                self.compliance_type = value.into_text::<Self>(field)?
            }
            ComplianceField::Section => self.section = value.into_text::<Self>(field)?,
            ComplianceField::Description => self.description = value.into_text::<Self>(field)?,
        }
        Ok(())
    }
}

// =============================================================================
// 상관 정보 (익스플로잇 / 악성코드)
// =============================================================================

record_fields! {
    /// [`ExploitSource`] 필드
    pub enum ExploitSourceField {
        Name => "name",
        Exploits => "exploits",
    }
}

/// 익스플로잇 출처와 그 출처가 보고한 익스플로잇 목록
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExploitSource {
    pub name: String,
    #[serde(default)]
    pub exploits: Vec<Exploit>,
}

static EXPLOIT_SOURCE_MAP: LazyLock<ParamMap<ExploitSourceField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("SRC_NAME", ExploitSourceField::Name)
        .query(
            "EXPLT_LIST",
            ExploitSourceField::Exploits,
            RecordKind::Exploit,
            "EXPLT_LIST/EXPLT",
        )
});

impl Record for ExploitSource {
    type Field = ExploitSourceField;
    const NAME: &'static str = "ExploitSource";
    const TAG: &'static str = "EXPLT_SRC";

    fn param_map() -> &'static ParamMap<ExploitSourceField> {
        &EXPLOIT_SOURCE_MAP
    }

    fn assign(&mut self, field: ExploitSourceField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            ExploitSourceField::Name => self.name = value.into_text::<Self>(field)?,
            ExploitSourceField::Exploits => self
                .exploits
                .extend(value.into_records::<Self, Exploit>(field)?),
        }
        Ok(())
    }

    fn finish(&mut self, source: &SourceNode) -> Result<(), ObjectError> {
        require(source.tag(), "SRC_NAME", &self.name)
    }

    fn key(&self) -> Result<String, ObjectError> {
        Ok(self.name.clone())
    }
}

record_fields! {
    /// [`Exploit`] 필드
    pub enum ExploitField {
        Reference => "reference",
        Description => "description",
        Link => "link",
    }
}

/// 알려진 익스플로잇
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Exploit {
    pub reference: String,
    pub description: String,
    pub link: String,
}

static EXPLOIT_MAP: LazyLock<ParamMap<ExploitField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("REF", ExploitField::Reference)
        .scalar("DESC", ExploitField::Description)
        .scalar("LINK", ExploitField::Link)
});

impl Record for Exploit {
    type Field = ExploitField;
    const NAME: &'static str = "Exploit";
    const TAG: &'static str = "EXPLT";

    fn param_map() -> &'static ParamMap<ExploitField> {
        &EXPLOIT_MAP
    }

    fn assign(&mut self, field: ExploitField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            ExploitField::Reference => self.reference = value.into_text::<Self>(field)?,
            ExploitField::Description => self.description = value.into_text::<Self>(field)?,
            ExploitField::Link => self.link = value.into_text::<Self>(field)?,
        }
        Ok(())
    }

    fn key(&self) -> Result<String, ObjectError> {
        Ok(self.reference.clone())
    }
}

record_fields! {
    /// [`MalwareSource`] 필드
    pub enum MalwareSourceField {
        Name => "name",
        Malware => "malware",
    }
}

/// 악성코드 정보 출처
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MalwareSource {
    pub name: String,
    #[serde(default)]
    pub malware: Vec<Malware>,
}

static MALWARE_SOURCE_MAP: LazyLock<ParamMap<MalwareSourceField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("SRC_NAME", MalwareSourceField::Name)
        .query(
            "MW_LIST",
            MalwareSourceField::Malware,
            RecordKind::Malware,
            "MW_LIST/MW_INFO",
        )
});

impl Record for MalwareSource {
    type Field = MalwareSourceField;
    const NAME: &'static str = "MalwareSource";
    const TAG: &'static str = "MW_SRC";

    fn param_map() -> &'static ParamMap<MalwareSourceField> {
        &MALWARE_SOURCE_MAP
    }

    fn assign(&mut self, field: MalwareSourceField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            MalwareSourceField::Name => self.name = value.into_text::<Self>(field)?,
            MalwareSourceField::Malware => self
                .malware
                .extend(value.into_records::<Self, Malware>(field)?),
        }
        Ok(())
    }

    fn finish(&mut self, source: &SourceNode) -> Result<(), ObjectError> {
        require(source.tag(), "SRC_NAME", &self.name)
    }

    fn key(&self) -> Result<String, ObjectError> {
        Ok(self.name.clone())
    }
}

record_fields! {
    /// [`Malware`] 필드
    pub enum MalwareField {
        MwId => "mw_id",
        MwType => "mw_type",
        Platform => "platform",
        Alias => "alias",
        Rating => "rating",
        Link => "link",
    }
}

/// 취약점을 악용하는 악성코드
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Malware {
    pub mw_id: String,
    pub mw_type: String,
    pub platform: String,
    pub alias: String,
    pub rating: String,
    pub link: String,
}

static MALWARE_MAP: LazyLock<ParamMap<MalwareField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("MW_ID", MalwareField::MwId)
        .scalar("MW_TYPE", MalwareField::MwType)
        .scalar("MW_PLATFORM", MalwareField::Platform)
        .scalar("MW_ALIAS", MalwareField::Alias)
        .scalar("MW_RATING", MalwareField::Rating)
        .scalar("MW_LINK", MalwareField::Link)
});

impl Record for Malware {
    type Field = MalwareField;
    const NAME: &'static str = "Malware";
    const TAG: &'static str = "MW_INFO";

    fn param_map() -> &'static ParamMap<MalwareField> {
        &MALWARE_MAP
    }

    fn assign(&mut self, field: MalwareField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            MalwareField::MwId => self.mw_id = value.into_text::<Self>(field)?,
            MalwareField::MwType => self.mw_type = value.into_text::<Self>(field)?,
            MalwareField::Platform => self.platform = value.into_text::<Self>(field)?,
            MalwareField::Alias => self.alias = value.into_text::<Self>(field)?,
            MalwareField::Rating => self.rating = value.into_text::<Self>(field)?,
            MalwareField::Link => self.link = value.into_text::<Self>(field)?,
        }
        Ok(())
    }

    fn key(&self) -> Result<String, ObjectError> {
        Ok(self.mw_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(tag: &str, value: &str) -> SourceNode {
        SourceNode::new(tag).with_text(value)
    }

    fn list(wrapper: &str, items: Vec<SourceNode>) -> SourceNode {
        items
            .into_iter()
            .fold(SourceNode::new(wrapper), SourceNode::with_child)
    }

    #[test]
    fn minimal_vulnerability_defaults() {
        let source = SourceNode::new("VULN").with_text_child("QID", "105943");
        let vuln = Vulnerability::decode_from(&source).unwrap();
        assert_eq!(vuln.qid, "105943");
        assert!(vuln.patch_available);
        assert!(vuln.pci_must_fix);
        assert!(vuln.remote_detectable);
        assert_eq!(vuln.cvss, Cvss::default());
        assert!(vuln.cves.is_empty());
        assert_eq!(vuln.key().unwrap(), "105943");
    }

    #[test]
    fn missing_qid_is_malformed() {
        let source = SourceNode::new("VULN").with_text_child("TITLE", "no id");
        let err = Vulnerability::decode_from(&source).unwrap_err();
        assert!(err.to_string().contains("missing required QID"));
    }

    #[test]
    fn patchable_zero_without_cvss() {
        let source = SourceNode::new("VULN")
            .with_text_child("QID", "1")
            .with_text_child("PATCHABLE", "0");
        let vuln = Vulnerability::decode_from(&source).unwrap();
        assert!(!vuln.patch_available);
        assert_eq!(vuln.cvss, Cvss::default());
        assert!(vuln.cvss.base_score().is_none());
    }

    #[test]
    fn empty_cvss_still_constructs_nested_record() {
        let source = SourceNode::new("VULN")
            .with_text_child("QID", "1")
            .with_child(SourceNode::new("CVSS"));
        let vuln = Vulnerability::decode_from(&source).unwrap();
        assert_eq!(vuln.cvss, Cvss::default());
    }

    #[test]
    fn cvss_nested_objects() {
        let cvss = SourceNode::new("CVSS")
            .with_text_child("BASE", "7.5")
            .with_text_child("TEMPORAL", "6.2")
            .with_child(
                SourceNode::new("ACCESS")
                    .with_text_child("VECTOR", "Network")
                    .with_text_child("COMPLEXITY", "Low"),
            )
            .with_child(
                SourceNode::new("IMPACT")
                    .with_text_child("CONFIDENTIALITY", "Partial")
                    .with_text_child("INTEGRITY", "None")
                    .with_text_child("AVAILABILITY", "Complete"),
            );
        let decoded = Cvss::decode_from(&cvss).unwrap();
        assert_eq!(decoded.base_score(), Some(7.5));
        assert_eq!(decoded.access.vector, "Network");
        assert_eq!(decoded.impact.availability, "Complete");
        assert!(matches!(
            decoded.key(),
            Err(ObjectError::NotImplemented { record: "Cvss", .. })
        ));
    }

    #[test]
    fn inline_lists_keep_document_order() {
        let cve = |id: &str| SourceNode::new("CVE").with_text_child("ID", id);
        let source = SourceNode::new("VULN")
            .with_text_child("QID", "1")
            .with_child(list("CVE_LIST", vec![cve("A"), cve("B"), cve("C")]));
        let vuln = Vulnerability::decode_from(&source).unwrap();
        assert_eq!(vuln.cve_ids(), vec!["A", "B", "C"]);
    }

    #[test]
    fn bugtraq_list_with_two_entries() {
        let bugtraq = |id: &str| {
            SourceNode::new("BUGTRAQ")
                .with_text_child("ID", id)
                .with_text_child("URL", format!("https://www.securityfocus.com/bid/{id}"))
        };
        let source = SourceNode::new("VULN")
            .with_text_child("QID", "1")
            .with_child(list("BUGTRAQ_LIST", vec![bugtraq("100"), bugtraq("200")]));
        let vuln = Vulnerability::decode_from(&source).unwrap();
        assert_eq!(vuln.bugtraqs.len(), 2);
        assert_eq!(vuln.bugtraqs[1].key().unwrap(), "200");
    }

    #[test]
    fn correlation_sources_and_exploits() {
        let exploit = |reference: &str| {
            SourceNode::new("EXPLT")
                .with_text_child("REF", reference)
                .with_text_child("DESC", "remote code execution")
        };
        let source = SourceNode::new("VULN").with_text_child("QID", "1").with_child(
            SourceNode::new("CORRELATION")
                .with_child(list(
                    "EXPLOITS",
                    vec![
                        SourceNode::new("EXPLT_SRC")
                            .with_text_child("SRC_NAME", "The Exploit-DB")
                            .with_child(list("EXPLT_LIST", vec![exploit("E-1"), exploit("E-2")])),
                        SourceNode::new("EXPLT_SRC")
                            .with_text_child("SRC_NAME", "Metasploit")
                            .with_child(list("EXPLT_LIST", vec![exploit("M-1")])),
                    ],
                ))
                .with_child(list(
                    "MALWARE",
                    vec![SourceNode::new("MW_SRC")
                        .with_text_child("SRC_NAME", "Trend Micro")
                        .with_child(list(
                            "MW_LIST",
                            vec![SourceNode::new("MW_INFO")
                                .with_text_child("MW_ID", "TROJ_X")
                                .with_text_child("MW_RATING", "High")],
                        ))],
                )),
        );
        let vuln = Vulnerability::decode_from(&source).unwrap();

        let names: Vec<_> = vuln.exploit_sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["The Exploit-DB", "Metasploit"]);
        let refs: Vec<_> = vuln.exploits().map(|e| e.reference.as_str()).collect();
        assert_eq!(refs, vec!["E-1", "E-2", "M-1"]);

        assert_eq!(vuln.malware_sources.len(), 1);
        assert_eq!(vuln.malware_sources[0].malware[0].mw_id, "TROJ_X");
        assert_eq!(vuln.malware_sources[0].malware[0].rating, "High");
    }

    #[test]
    fn exploit_source_requires_name() {
        let err = ExploitSource::decode_from(&SourceNode::new("EXPLT_SRC")).unwrap_err();
        assert!(err.to_string().contains("SRC_NAME"));
        let err = MalwareSource::decode_from(&SourceNode::new("MW_SRC")).unwrap_err();
        assert!(err.to_string().contains("SRC_NAME"));
    }

    #[test]
    fn discovery_group_flattens_onto_vulnerability() {
        let source = SourceNode::new("VULN").with_text_child("QID", "1").with_child(
            SourceNode::new("DISCOVERY")
                .with_child(text("REMOTE", "1"))
                .with_child(list(
                    "AUTH_TYPE_LIST",
                    vec![text("AUTH_TYPE", "Windows"), text("AUTH_TYPE", "Oracle")],
                )),
        );
        let vuln = Vulnerability::decode_from(&source).unwrap();
        assert!(vuln.remote_detectable);
        assert_eq!(vuln.auth_types, vec!["Windows", "Oracle"]);
    }

    #[test]
    fn compliance_software_vendor_and_pci_reasons() {
        let source = SourceNode::new("VULN")
            .with_text_child("QID", "1")
            .with_text_child("PCI_FLAG", "0")
            .with_child(list(
                "SOFTWARE_LIST",
                vec![SourceNode::new("SOFTWARE")
                    .with_text_child("PRODUCT", "openssl")
                    .with_text_child("VENDOR", "openssl")],
            ))
            .with_child(list(
                "VENDOR_REFERENCE_LIST",
                vec![SourceNode::new("VENDOR_REFERENCE").with_text_child("ID", "RHSA-2024:1")],
            ))
            .with_child(list(
                "COMPLIANCE_LIST",
                vec![SourceNode::new("COMPLIANCE")
                    .with_text_child("TYPE", "HIPAA")
                    .with_text_child("SECTION", "164.312(a)(1)")],
            ))
            .with_child(list(
                "PCI_REASONS",
                vec![text("PCI_REASON", "Vulnerability has a CVSS score >= 4.0")],
            ));
        let vuln = Vulnerability::decode_from(&source).unwrap();
        assert!(!vuln.pci_must_fix);
        assert_eq!(vuln.software[0].product, "openssl");
        assert_eq!(vuln.vendor_references[0].key().unwrap(), "RHSA-2024:1");
        assert_eq!(vuln.compliance[0].compliance_type, "HIPAA");
        assert_eq!(vuln.pci_reasons.len(), 1);
    }

    #[test]
    fn compliance_serializes_type_key() {
        let compliance = Compliance {
            compliance_type: "SOX".to_owned(),
            ..Default::default()
        };
        let dict = compliance.to_dict().unwrap();
        assert_eq!(dict.get("type").and_then(|v| v.as_str()), Some("SOX"));
    }

    #[test]
    fn payload_without_qid_is_malformed() {
        let mut vuln = Vulnerability::default();
        vuln.qid = "1".to_owned();
        let mut dict = vuln.to_dict().unwrap();
        dict.remove("qid");
        let err = Vulnerability::from_payload(&dict).unwrap_err();
        assert!(matches!(err, ObjectError::MalformedDocument { .. }));
    }

    #[test]
    fn payload_without_flags_defaults_to_true() {
        let mut payload = crate::record::Payload::new();
        payload.insert("qid".to_owned(), "7".into());
        let vuln = Vulnerability::from_payload(&payload).unwrap();
        assert!(vuln.patch_available);
        assert!(vuln.remote_detectable);
    }

    #[test]
    fn datetime_helpers() {
        let vuln = Vulnerability {
            qid: "1".to_owned(),
            published: "2001-01-01T08:00:00Z".to_owned(),
            severity_level: "4".to_owned(),
            ..Default::default()
        };
        assert!(vuln.published_at().is_some());
        assert!(vuln.last_modified_at().is_none());
        assert_eq!(vuln.severity(), Some(4));
    }
}

//! 호스트와 자산 그룹 레코드

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ObjectError;
use crate::record::{require, Record};
use crate::records::common::parse_datetime;
use crate::registry::RecordKind;
use crate::schema::{record_fields, FieldValue, ParamMap};
use crate::source::SourceNode;

// =============================================================================
// Host
// =============================================================================

record_fields! {
    /// [`Host`] 필드
    pub enum HostField {
        Id => "id",
        Ip => "ip",
        TrackingMethod => "tracking_method",
        Dns => "dns",
        Netbios => "netbios",
        Os => "os",
        LastScan => "last_scan",
    }
}

/// 스캔 대상 호스트
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub id: String,
    #[serde(default)]
    pub ip: String,
    #[serde(default)]
    pub tracking_method: String,
    #[serde(default)]
    pub dns: String,
    #[serde(default)]
    pub netbios: String,
    #[serde(default)]
    pub os: String,
    #[serde(default)]
    pub last_scan: String,
}

static HOST_MAP: LazyLock<ParamMap<HostField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("ID", HostField::Id)
        .scalar("IP", HostField::Ip)
        .scalar("TRACKING_METHOD", HostField::TrackingMethod)
        .scalar("DNS", HostField::Dns)
        .scalar("NETBIOS", HostField::Netbios)
        .scalar("OS", HostField::Os)
        .scalar("LAST_VULN_SCAN_DATETIME", HostField::LastScan)
        .scalar("LAST_SCAN_DATETIME", HostField::LastScan)
});

impl Record for Host {
    type Field = HostField;
    const NAME: &'static str = "Host";
    const TAG: &'static str = "HOST";

    fn param_map() -> &'static ParamMap<HostField> {
        &HOST_MAP
    }

    fn assign(&mut self, field: HostField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            HostField::Id => self.id = value.into_text::<Self>(field)?,
            HostField::Ip => self.ip = value.into_text::<Self>(field)?,
            HostField::TrackingMethod => self.tracking_method = value.into_text::<Self>(field)?,
            HostField::Dns => self.dns = value.into_text::<Self>(field)?,
            HostField::Netbios => self.netbios = value.into_text::<Self>(field)?,
            HostField::Os => self.os = value.into_text::<Self>(field)?,
            HostField::LastScan => self.last_scan = value.into_text::<Self>(field)?,
        }
        Ok(())
    }

    fn finish(&mut self, source: &SourceNode) -> Result<(), ObjectError> {
        require(source.tag(), "ID", &self.id)
    }

    fn key(&self) -> Result<String, ObjectError> {
        Ok(self.id.clone())
    }
}

impl Host {
    /// 마지막 취약점 스캔 시각
    pub fn last_scanned_at(&self) -> Option<DateTime<Utc>> {
        parse_datetime(&self.last_scan)
    }
}

// =============================================================================
// AssetGroup
// =============================================================================

record_fields! {
    /// [`AssetGroup`] 필드
    pub enum AssetGroupField {
        Id => "id",
        Title => "title",
        LastUpdate => "last_update",
        BusinessImpact => "business_impact",
        ScanIps => "scan_ips",
        ScanDns => "scan_dns",
        ScannerAppliances => "scanner_appliances",
    }
}

/// 자산 그룹
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetGroup {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub last_update: String,
    #[serde(default)]
    pub business_impact: String,
    #[serde(default)]
    pub scan_ips: Vec<String>,
    #[serde(default)]
    pub scan_dns: Vec<String>,
    #[serde(default)]
    pub scanner_appliances: Vec<String>,
}

static ASSET_GROUP_MAP: LazyLock<ParamMap<AssetGroupField>> = LazyLock::new(|| {
    use AssetGroupField as F;

    ParamMap::new()
        .scalar("ID", F::Id)
        .scalar("TITLE", F::Title)
        .scalar("LAST_UPDATE", F::LastUpdate)
        .scalar("BUSINESS_IMPACT", F::BusinessImpact)
        .group(
            "SCANIPS",
            ParamMap::new().inline("IP", F::ScanIps, RecordKind::TextValue),
        )
        .group(
            "SCANDNS",
            ParamMap::new().inline("DNS", F::ScanDns, RecordKind::TextValue),
        )
        .group(
            "SCANNER_APPLIANCES",
            ParamMap::new().inline(
                "SCANNER_APPLIANCE",
                F::ScannerAppliances,
                RecordKind::TextValue,
            ),
        )
});

impl Record for AssetGroup {
    type Field = AssetGroupField;
    const NAME: &'static str = "AssetGroup";
    const TAG: &'static str = "ASSET_GROUP";

    fn param_map() -> &'static ParamMap<AssetGroupField> {
        &ASSET_GROUP_MAP
    }

    fn assign(&mut self, field: AssetGroupField, value: FieldValue) -> Result<(), ObjectError> {
        use AssetGroupField as F;

        match field {
            F::Id => self.id = value.into_text::<Self>(field)?,
            F::Title => self.title = value.into_text::<Self>(field)?,
            F::LastUpdate => self.last_update = value.into_text::<Self>(field)?,
            F::BusinessImpact => self.business_impact = value.into_text::<Self>(field)?,
            F::ScanIps => self.scan_ips.extend(value.into_text_list::<Self>(field)?),
            F::ScanDns => self.scan_dns.extend(value.into_text_list::<Self>(field)?),
            F::ScannerAppliances => self
                .scanner_appliances
                .extend(value.into_text_list::<Self>(field)?),
        }
        Ok(())
    }

    fn finish(&mut self, source: &SourceNode) -> Result<(), ObjectError> {
        require(source.tag(), "ID", &self.id)
    }

    fn key(&self) -> Result<String, ObjectError> {
        Ok(self.id.clone())
    }
}

impl AssetGroup {
    /// 로컬 IP 목록에 자산을 추가합니다. 이미 있으면 무시합니다.
    ///
    /// 서비스 측 반영은 전송 계층의 편집 요청으로 별도 수행합니다.
    pub fn add_asset(&mut self, ip: impl Into<String>) {
        let ip = ip.into();
        if !self.scan_ips.contains(&ip) {
            self.scan_ips.push(ip);
        }
    }

    /// 로컬 IP 목록을 교체합니다.
    pub fn set_assets<I, S>(&mut self, ips: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scan_ips = ips.into_iter().map(Into::into).collect();
    }

    /// 마지막 수정 시각
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        parse_datetime(&self.last_update)
    }
}

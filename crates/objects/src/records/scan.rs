//! 스캔 레코드
//!
//! 스캔 상태에 따라 가능한 생명주기 동작(취소, 일시정지, 재개)을 판별하는
//! 헬퍼를 제공합니다. 실제 요청은 전송 계층이 보냅니다.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ObjectError;
use crate::record::{require, Record};
use crate::records::common::parse_datetime;
use crate::registry::RecordKind;
use crate::schema::{record_fields, FieldValue, ParamMap};
use crate::source::SourceNode;

/// 취소할 수 없는 종료 상태
const TERMINAL_STATES: &[&str] = &["Cancelled", "Finished", "Error"];

record_fields! {
    /// [`Scan`] 필드
    pub enum ScanField {
        Reference => "ref",
        ScanType => "type",
        Title => "title",
        UserLogin => "user_login",
        LaunchDatetime => "launch_datetime",
        Duration => "duration",
        Processed => "processed",
        Status => "status",
        Target => "target",
        OptionProfile => "option_profile",
        AssetGroups => "asset_groups",
    }
}

/// 스캔
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "type", default)]
    pub scan_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub user_login: String,
    #[serde(default)]
    pub launch_datetime: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub processed: String,
    #[serde(default)]
    pub status: ScanStatus,
    /// 쉼표로 구분된 대상 목록 원문
    #[serde(default)]
    pub target: String,
    /// 옵션 프로필 제목 (`OPTION_PROFILE/TITLE`)
    #[serde(default)]
    pub option_profile: String,
    #[serde(default)]
    pub asset_groups: Vec<String>,
}

static SCAN_MAP: LazyLock<ParamMap<ScanField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("REF", ScanField::Reference)
        .scalar("TYPE", ScanField::ScanType)
        .scalar("TITLE", ScanField::Title)
        .scalar("USER_LOGIN", ScanField::UserLogin)
        .scalar("LAUNCH_DATETIME", ScanField::LaunchDatetime)
        .scalar("DURATION", ScanField::Duration)
        .scalar("PROCESSED", ScanField::Processed)
        .object("STATUS", ScanField::Status, RecordKind::ScanStatus)
        .scalar("TARGET", ScanField::Target)
        .group(
            "OPTION_PROFILE",
            ParamMap::new().scalar("TITLE", ScanField::OptionProfile),
        )
        .group(
            "ASSET_GROUP_TITLE_LIST",
            ParamMap::new().inline(
                "ASSET_GROUP_TITLE",
                ScanField::AssetGroups,
                RecordKind::TextValue,
            ),
        )
});

impl Record for Scan {
    type Field = ScanField;
    const NAME: &'static str = "Scan";
    const TAG: &'static str = "SCAN";

    fn param_map() -> &'static ParamMap<ScanField> {
        &SCAN_MAP
    }

    fn assign(&mut self, field: ScanField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            ScanField::Reference => self.reference = value.into_text::<Self>(field)?,
            ScanField::ScanType => self.scan_type = value.into_text::<Self>(field)?,
            ScanField::Title => self.title = value.into_text::<Self>(field)?,
            ScanField::UserLogin => self.user_login = value.into_text::<Self>(field)?,
            ScanField::LaunchDatetime => self.launch_datetime = value.into_text::<Self>(field)?,
            ScanField::Duration => self.duration = value.into_text::<Self>(field)?,
            ScanField::Processed => self.processed = value.into_text::<Self>(field)?,
            ScanField::Status => self.status = value.into_record::<Self, ScanStatus>(field)?,
            ScanField::Target => self.target = value.into_text::<Self>(field)?,
            ScanField::OptionProfile => self.option_profile = value.into_text::<Self>(field)?,
            ScanField::AssetGroups => self
                .asset_groups
                .extend(value.into_text_list::<Self>(field)?),
        }
        Ok(())
    }

    fn finish(&mut self, source: &SourceNode) -> Result<(), ObjectError> {
        require(source.tag(), "REF", &self.reference)
    }

    fn key(&self) -> Result<String, ObjectError> {
        Ok(self.reference.clone())
    }
}

impl Scan {
    /// 대상 목록 (`", "` 구분)
    pub fn targets(&self) -> Vec<&str> {
        self.target
            .split(", ")
            .map(str::trim)
            .filter(|target| !target.is_empty())
            .collect()
    }

    /// 시작 시각
    pub fn launched_at(&self) -> Option<DateTime<Utc>> {
        parse_datetime(&self.launch_datetime)
    }

    /// 결과 처리가 끝났는지 확인합니다.
    pub fn is_processed(&self) -> bool {
        self.processed.trim() == "1"
    }

    /// 취소 요청이 가능한 상태인지 확인합니다.
    pub fn can_cancel(&self) -> bool {
        !TERMINAL_STATES.contains(&self.status.state.as_str())
    }

    /// 일시정지 요청이 가능한 상태인지 확인합니다.
    pub fn can_pause(&self) -> bool {
        self.status.state == "Running"
    }

    /// 재개 요청이 가능한 상태인지 확인합니다.
    pub fn can_resume(&self) -> bool {
        self.status.state == "Paused"
    }
}

record_fields! {
    /// [`ScanStatus`] 필드
    pub enum ScanStatusField {
        State => "state",
        SubState => "sub_state",
    }
}

/// 스캔 진행 상태
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanStatus {
    pub state: String,
    pub sub_state: String,
}

static SCAN_STATUS_MAP: LazyLock<ParamMap<ScanStatusField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("STATE", ScanStatusField::State)
        .scalar("SUB_STATE", ScanStatusField::SubState)
});

impl Record for ScanStatus {
    type Field = ScanStatusField;
    const NAME: &'static str = "ScanStatus";
    const TAG: &'static str = "STATUS";

    fn param_map() -> &'static ParamMap<ScanStatusField> {
        &SCAN_STATUS_MAP
    }

    fn assign(&mut self, field: ScanStatusField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            ScanStatusField::State => self.state = value.into_text::<Self>(field)?,
            ScanStatusField::SubState => self.sub_state = value.into_text::<Self>(field)?,
        }
        Ok(())
    }
}

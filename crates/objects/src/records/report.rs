//! 리포트, 리포트 템플릿, 사용자 레코드

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ObjectError;
use crate::record::{require, Record};
use crate::records::common::parse_datetime;
use crate::registry::RecordKind;
use crate::schema::{record_fields, FieldValue, ParamMap};
use crate::source::SourceNode;

/// 완료된 리포트 상태
const FINISHED_STATE: &str = "Finished";

// =============================================================================
// Report
// =============================================================================

record_fields! {
    /// [`Report`] 필드
    pub enum ReportField {
        Id => "id",
        Title => "title",
        ReportType => "report_type",
        UserLogin => "user_login",
        LaunchDatetime => "launch_datetime",
        OutputFormat => "output_format",
        Size => "size",
        Status => "status",
        ExpirationDatetime => "expiration_datetime",
    }
}

/// 생성된 리포트 핸들
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub report_type: String,
    #[serde(default)]
    pub user_login: String,
    #[serde(default)]
    pub launch_datetime: String,
    #[serde(default)]
    pub output_format: String,
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub status: ReportStatus,
    #[serde(default)]
    pub expiration_datetime: String,
}

static REPORT_MAP: LazyLock<ParamMap<ReportField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("ID", ReportField::Id)
        .scalar("TITLE", ReportField::Title)
        .scalar("TYPE", ReportField::ReportType)
        .scalar("USER_LOGIN", ReportField::UserLogin)
        .scalar("LAUNCH_DATETIME", ReportField::LaunchDatetime)
        .scalar("OUTPUT_FORMAT", ReportField::OutputFormat)
        .scalar("SIZE", ReportField::Size)
        .object("STATUS", ReportField::Status, RecordKind::ReportStatus)
        .scalar("EXPIRATION_DATETIME", ReportField::ExpirationDatetime)
});

impl Record for Report {
    type Field = ReportField;
    const NAME: &'static str = "Report";
    const TAG: &'static str = "REPORT";

    fn param_map() -> &'static ParamMap<ReportField> {
        &REPORT_MAP
    }

    fn assign(&mut self, field: ReportField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            ReportField::Id => self.id = value.into_text::<Self>(field)?,
            ReportField::Title => self.title = value.into_text::<Self>(field)?,
            ReportField::ReportType => self.report_type = value.into_text::<Self>(field)?,
            ReportField::UserLogin => self.user_login = value.into_text::<Self>(field)?,
            ReportField::LaunchDatetime => self.launch_datetime = value.into_text::<Self>(field)?,
            ReportField::OutputFormat => self.output_format = value.into_text::<Self>(field)?,
            ReportField::Size => self.size = value.into_text::<Self>(field)?,
            ReportField::Status => self.status = value.into_record::<Self, ReportStatus>(field)?,
            ReportField::ExpirationDatetime => {
                self.expiration_datetime = value.into_text::<Self>(field)?
            }
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

impl Report {
    /// 리포트 생성이 끝나 내려받을 수 있는 상태인지 확인합니다.
    pub fn is_finished(&self) -> bool {
        self.status.state == FINISHED_STATE
    }

    /// 생성 시작 시각
    pub fn launched_at(&self) -> Option<DateTime<Utc>> {
        parse_datetime(&self.launch_datetime)
    }

    /// 만료 시각
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        parse_datetime(&self.expiration_datetime)
    }
}

record_fields! {
    /// [`ReportStatus`] 필드
    pub enum ReportStatusField {
        State => "state",
        Message => "message",
        Percent => "percent",
    }
}

/// 리포트 진행 상태
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportStatus {
    pub state: String,
    pub message: String,
    pub percent: String,
}

static REPORT_STATUS_MAP: LazyLock<ParamMap<ReportStatusField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("STATE", ReportStatusField::State)
        .scalar("MESSAGE", ReportStatusField::Message)
        .scalar("PERCENT", ReportStatusField::Percent)
});

impl Record for ReportStatus {
    type Field = ReportStatusField;
    const NAME: &'static str = "ReportStatus";
    const TAG: &'static str = "STATUS";

    fn param_map() -> &'static ParamMap<ReportStatusField> {
        &REPORT_STATUS_MAP
    }

    fn assign(&mut self, field: ReportStatusField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            ReportStatusField::State => self.state = value.into_text::<Self>(field)?,
            ReportStatusField::Message => self.message = value.into_text::<Self>(field)?,
            ReportStatusField::Percent => self.percent = value.into_text::<Self>(field)?,
        }
        Ok(())
    }
}

// =============================================================================
// ReportTemplate
// =============================================================================

record_fields! {
    /// [`ReportTemplate`] 필드
    pub enum ReportTemplateField {
        Id => "id",
        ReportType => "report_type",
        TemplateType => "template_type",
        Title => "title",
        User => "user",
        LastUpdate => "last_update",
        Global => "global",
        IsDefault => "default",
    }
}

/// 리포트 템플릿
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportTemplate {
    pub id: String,
    #[serde(default)]
    pub report_type: String,
    #[serde(default)]
    pub template_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub user: Option<QualysUser>,
    #[serde(default)]
    pub last_update: String,
    /// `GLOBAL` 원문 (`1`이면 전역 템플릿)
    #[serde(default)]
    pub global: String,
    /// `DEFAULT` 원문 (`1`이면 기본 템플릿)
    #[serde(default)]
    pub default: String,
}

static REPORT_TEMPLATE_MAP: LazyLock<ParamMap<ReportTemplateField>> = LazyLock::new(|| {
    use ReportTemplateField as F;

    ParamMap::new()
        .scalar("ID", F::Id)
        .scalar("TYPE", F::ReportType)
        .scalar("TEMPLATE_TYPE", F::TemplateType)
        .scalar("TITLE", F::Title)
        .object("USER", F::User, RecordKind::QualysUser)
        .scalar("LAST_UPDATE", F::LastUpdate)
        .scalar("GLOBAL", F::Global)
        .scalar("DEFAULT", F::IsDefault)
});

impl Record for ReportTemplate {
    type Field = ReportTemplateField;
    const NAME: &'static str = "ReportTemplate";
    const TAG: &'static str = "REPORT_TEMPLATE";

    fn param_map() -> &'static ParamMap<ReportTemplateField> {
        &REPORT_TEMPLATE_MAP
    }

    fn assign(&mut self, field: ReportTemplateField, value: FieldValue) -> Result<(), ObjectError> {
        use ReportTemplateField as F;

        match field {
            F::Id => self.id = value.into_text::<Self>(field)?,
            F::ReportType => self.report_type = value.into_text::<Self>(field)?,
            F::TemplateType => self.template_type = value.into_text::<Self>(field)?,
            F::Title => self.title = value.into_text::<Self>(field)?,
            F::User => self.user = Some(value.into_record::<Self, QualysUser>(field)?),
            F::LastUpdate => self.last_update = value.into_text::<Self>(field)?,
            F::Global => self.global = value.into_text::<Self>(field)?,
            F::IsDefault => self.default = value.into_text::<Self>(field)?,
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

impl ReportTemplate {
    /// 전역 템플릿 여부
    pub fn is_global(&self) -> bool {
        self.global.trim() == "1"
    }

    /// 기본 템플릿 여부
    pub fn is_default(&self) -> bool {
        self.default.trim() == "1"
    }

    /// 마지막 수정 시각
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        parse_datetime(&self.last_update)
    }
}

// =============================================================================
// QualysUser
// =============================================================================

record_fields! {
    /// [`QualysUser`] 필드
    pub enum QualysUserField {
        Login => "login",
        FirstName => "firstname",
        LastName => "lastname",
    }
}

/// 서비스 사용자
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualysUser {
    pub login: String,
    pub firstname: String,
    pub lastname: String,
}

static QUALYS_USER_MAP: LazyLock<ParamMap<QualysUserField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("LOGIN", QualysUserField::Login)
        .scalar("FIRSTNAME", QualysUserField::FirstName)
        .scalar("LASTNAME", QualysUserField::LastName)
});

impl Record for QualysUser {
    type Field = QualysUserField;
    const NAME: &'static str = "QualysUser";
    const TAG: &'static str = "USER";

    fn param_map() -> &'static ParamMap<QualysUserField> {
        &QUALYS_USER_MAP
    }

    fn assign(&mut self, field: QualysUserField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            QualysUserField::Login => self.login = value.into_text::<Self>(field)?,
            QualysUserField::FirstName => self.firstname = value.into_text::<Self>(field)?,
            QualysUserField::LastName => self.lastname = value.into_text::<Self>(field)?,
        }
        Ok(())
    }

    fn key(&self) -> Result<String, ObjectError> {
        Ok(self.login.clone())
    }
}

impl QualysUser {
    /// 이름과 성을 이어 붙인 표시 이름
    pub fn full_name(&self) -> String {
        [self.firstname.trim(), self.lastname.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

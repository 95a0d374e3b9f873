//! 네트워크 맵 레코드
//!
//! `<MAP_REPORT>` 문서는 [`Map`]으로 디코딩됩니다. 맵의 식별 정보(ref, date,
//! domain, status)는 자식 요소가 아니라 루트 속성에 있으므로 스키마 적용 뒤
//! `finish`에서 읽습니다.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::error::ObjectError;
use crate::record::Record;
use crate::records::report::Report;
use crate::registry::RecordKind;
use crate::schema::{record_fields, FieldValue, ParamMap};
use crate::source::SourceNode;

record_fields! {
    /// [`Map`] 필드
    pub enum MapField {
        Name => "name",
        OptionProfiles => "option_profiles",
    }
}

/// 네트워크 맵
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Map {
    pub name: String,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
    pub date: Option<String>,
    pub domain: Option<String>,
    pub status: Option<String>,
    /// 이 맵으로 생성한 리포트 ID
    pub report_id: Option<String>,
    pub option_profiles: Vec<OptionProfile>,
}

static MAP_MAP: LazyLock<ParamMap<MapField>> = LazyLock::new(|| {
    ParamMap::new()
        .scalar("TITLE", MapField::Name)
        .query(
            "OPTION_PROFILE",
            MapField::OptionProfiles,
            RecordKind::OptionProfile,
            "OPTION_PROFILE/*",
        )
});

impl Record for Map {
    type Field = MapField;
    const NAME: &'static str = "Map";
    const TAG: &'static str = "MAP_REPORT";

    fn param_map() -> &'static ParamMap<MapField> {
        &MAP_MAP
    }

    fn assign(&mut self, field: MapField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            MapField::Name => self.name = value.into_text::<Self>(field)?,
            MapField::OptionProfiles => self
                .option_profiles
                .extend(value.into_records::<Self, OptionProfile>(field)?),
        }
        Ok(())
    }

    fn finish(&mut self, source: &SourceNode) -> Result<(), ObjectError> {
        let attribute = |name: &str| source.attribute(name).map(str::to_owned);
        self.reference = attribute("ref");
        self.date = attribute("date");
        self.domain = attribute("domain");
        self.status = attribute("status");

        // 제목이 하위 요소로 감싸져 있으면 전체 텍스트 사용
        if self.name.is_empty() {
            if let Some(title) = source.child("TITLE") {
                self.name = title.text_content();
            }
        }
        Ok(())
    }

    fn key(&self) -> Result<String, ObjectError> {
        Ok(self
            .reference
            .clone()
            .unwrap_or_else(|| self.name.clone()))
    }
}

impl Map {
    /// 연결된 리포트가 있는지 확인합니다.
    pub fn has_report(&self) -> bool {
        self.report_id.is_some()
    }

    /// 리포트 ID를 연결합니다.
    pub fn set_report_id(&mut self, report_id: impl Into<String>) {
        self.report_id = Some(report_id.into());
    }

    /// 리포트를 연결합니다.
    pub fn attach_report(&mut self, report: &Report) {
        self.report_id = Some(report.id.clone());
    }

    /// 기본 옵션 프로필
    pub fn default_option_profile(&self) -> Option<&OptionProfile> {
        self.option_profiles.iter().find(|profile| profile.is_default)
    }
}

impl fmt::Display for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<Map name='{}' date='{}' ref='{}' />",
            self.name,
            self.date.as_deref().unwrap_or_default(),
            self.reference.as_deref().unwrap_or_default()
        )
    }
}

record_fields! {
    /// [`OptionProfile`] 필드
    pub enum OptionProfileField {
        Title => "title",
    }
}

/// 맵에 사용된 옵션 프로필
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionProfile {
    pub title: String,
    /// `option_profile_default` 속성이 있고 `0`이 아닐 때 `true`
    pub is_default: bool,
}

static OPTION_PROFILE_MAP: LazyLock<ParamMap<OptionProfileField>> =
    LazyLock::new(ParamMap::new);

impl Record for OptionProfile {
    type Field = OptionProfileField;
    const NAME: &'static str = "OptionProfile";
    const TAG: &'static str = "OPTION_PROFILE_TITLE";

    fn param_map() -> &'static ParamMap<OptionProfileField> {
        &OPTION_PROFILE_MAP
    }

    fn assign(&mut self, field: OptionProfileField, value: FieldValue) -> Result<(), ObjectError> {
        match field {
            OptionProfileField::Title => self.title = value.into_text::<Self>(field)?,
        }
        Ok(())
    }

    /// 제목은 요소 자신의 텍스트, 기본 여부는 속성에서 옵니다.
    fn finish(&mut self, source: &SourceNode) -> Result<(), ObjectError> {
        let title = source.text().unwrap_or_default().to_owned();
        self.assign(OptionProfileField::Title, FieldValue::Text(title))?;
        self.is_default = source
            .attribute("option_profile_default")
            .is_some_and(|flag| flag.trim() != "0");
        Ok(())
    }

    fn key(&self) -> Result<String, ObjectError> {
        Ok(self.title.clone())
    }
}

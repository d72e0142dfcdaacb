//! Seoul cultural event listing tool.
//!
//! Queries the `culturalEventInfo` dataset published by the Seoul Culture
//! Portal (performances, exhibitions, festivals).

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::domains::tools::{ToolError, ToolHandler, parse_arguments};

use super::client::{SeoulApiClient, default_end_index, default_start_index, path_segment};

const DATASET: &str = "culturalEventInfo";

const URL_TEMPLATE: &str = "/{authKey}/json/culturalEventInfo/{StartIndex}/{EndIndex}";

/// Paging arguments for the cultural event listing, substituted into the
/// request path as text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CulturalEventParams {
    pub start_index: Option<Value>,
    pub end_index: Option<Value>,
}

/// Cultural event listing tool implementation.
#[derive(Debug, Clone)]
pub struct CulturalEventTool {
    client: SeoulApiClient,
}

impl CulturalEventTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "CulturalEventInfo";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "
  서울시 문화행사 정보를 조회할 수 있는 도구입니다.

  서울문화포털에서 제공하는 문화행사 정보입니다.
  공연, 행사에 대한 장소, 날짜, 기관명, 이용대상, 이용요금, 출연자, 프로그램 등의 정보를 제공합니다.


  반환되는 데이터는 JSON 형식으로 제공되며, 반환되는 데이터의 구조는 다음과 같습니다:

    list_total_count: 총 데이터 건수
    RESULT.CODE: 결과 코드
    RESULT.MESSAGE: 결과 메시지
    row: 데이터 배열

      각 데이터는 다음과 같은 필드를 포함합니다:

      CODENAME: 분류
      GUNAME: 자치구
      TITLE: 공연/행사명
      DATE: 날짜/시간
      PLACE: 장소
      ORG_NAME: 기관명
      USE_TRGT: 이용대상
      USE_FEE: 이용요금
      PLAYER: 출연자정보
      PROGRAM: 프로그램소개
      ETC_DESC: 기타정보
      ORG_LINK: 홈페이지 주소
      MAIN_IMG: 대표이미지
      RGSTDATE: 등록일
      TICKET: 시민/기관
      STRTDATE: 시작일
      END_DATE: 종료일
      THEMECODE: 테마분류
      LOT: 위도
      LAT: 경도
      IS_FREE: 무료여부
      HMPG_ADDR: 문화포털상세URL
  ";

    pub fn new(client: SeoulApiClient) -> Self {
        Self { client }
    }

    pub fn input_schema() -> Arc<JsonObject> {
        let schema = serde_json::json!({
            "type": "object",
            "properties": {
                "startIndex": {
                    "type": "number",
                    "description": "요청시작위치, 정수 입력 (페이징 시작번호 입니다 : 데이터 행 시작번호), 기본값 1을 사용합니다."
                },
                "endIndex": {
                    "type": "number",
                    "description": "요청종료위치, 정수 입력 (페이징 끝번호 입니다 : 데이터 행 끝번호), 기본값 10을 사용합니다. 최대값은 list_total_count입니다."
                }
            },
            "required": ["startIndex", "endIndex"]
        });
        Arc::new(schema.as_object().cloned().unwrap_or_default())
    }

    /// Fetch one page of events and return the dataset as JSON text.
    pub async fn fetch(&self, start_index: &str, end_index: &str) -> Result<String, ToolError> {
        info!(
            "Calling {} with args: startIndex={}, endIndex={}",
            Self::NAME,
            start_index,
            end_index
        );

        let url = self.client.build_url(
            URL_TEMPLATE,
            &[("{StartIndex}", start_index), ("{EndIndex}", end_index)],
        );
        let data = self.client.fetch_dataset(&url, DATASET).await?;

        Ok(data.to_string())
    }
}

#[async_trait::async_trait]
impl ToolHandler for CulturalEventTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn to_tool(&self) -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: Self::input_schema(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    async fn execute(&self, arguments: JsonObject) -> Result<String, ToolError> {
        let params: CulturalEventParams = parse_arguments(arguments)?;
        let start = path_segment(params.start_index, || default_start_index().to_string());
        let end = path_segment(params.end_index, || default_end_index().to_string());
        self.fetch(&start, &end).await
    }
}

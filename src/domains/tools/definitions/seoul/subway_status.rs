//! Seoul subway ridership tool.
//!
//! Queries the `CardSubwayStatsNew` dataset: daily boarding and alighting
//! counts per line and station, as recorded by transit card taps.

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use crate::domains::tools::{ToolError, ToolHandler, parse_arguments};

use super::client::{SeoulApiClient, default_end_index, default_start_index, path_segment};

const DATASET: &str = "CardSubwayStatsNew";

const URL_TEMPLATE: &str = "/{authKey}/json/CardSubwayStatsNew/{StartIndex}/{EndIndex}/{YYYYMMDD}/{SubwayLineNo}/{SubwayStationName}";

const DEFAULT_LINE_NO: &str = "1호선";
const DEFAULT_STATION_NAME: &str = "서울";

// ============================================================================
// Tool Parameters
// ============================================================================

/// Arguments as sent by the client. Every field may be omitted, and each
/// value is substituted into the request path as text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubwayStatusParams {
    pub start_index: Option<Value>,
    pub end_index: Option<Value>,
    /// Usage date, `YYYYMMDD`.
    pub date: Option<Value>,
    pub subway_line_no: Option<Value>,
    pub subway_station_name: Option<Value>,
}

/// Path segments after defaults have been filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubwayStatusQuery {
    pub start_index: String,
    pub end_index: String,
    pub date: String,
    pub subway_line_no: String,
    pub subway_station_name: String,
}

impl SubwayStatusParams {
    /// Backfill omitted fields. The date defaults to today (UTC).
    pub fn with_defaults(self) -> SubwayStatusQuery {
        SubwayStatusQuery {
            start_index: path_segment(self.start_index, || default_start_index().to_string()),
            end_index: path_segment(self.end_index, || default_end_index().to_string()),
            date: path_segment(self.date, today),
            subway_line_no: path_segment(self.subway_line_no, || DEFAULT_LINE_NO.to_string()),
            subway_station_name: path_segment(self.subway_station_name, || {
                DEFAULT_STATION_NAME.to_string()
            }),
        }
    }
}

fn today() -> String {
    chrono::Utc::now().format("%Y%m%d").to_string()
}

// ============================================================================
// Tool Implementation
// ============================================================================

/// Seoul subway ridership tool implementation.
#[derive(Debug, Clone)]
pub struct SubwayStatusTool {
    client: SeoulApiClient,
}

impl SubwayStatusTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "KoreaSeoulSubwayStatus";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "
  서울시 지하철호선별 역별 승하차 인원 정보를 조회할 수 있는 도구입니다.

  날짜는 YYYYMMDD 형식으로 입력해야 하며,
  지하철역 이름은 한글로 입력해야 합니다.
  예를 들어, \"서울역\"은 \"서울\"과 같은 형식입니다.
  지하철 노선 번호는 \"1호선\", \"2호선\"과 같은 형식으로 입력해야 합니다.

  반환되는 데이터는 JSON 형식으로 제공되며, 반환되는 데이터의 구조는 다음과 같습니다:

    list_total_count: 총 데이터 건수
    RESULT.CODE: 결과 코드
    RESULT.MESSAGE: 결과 메시지
    row: 데이터 배열

      각 데이터는 다음과 같은 필드를 포함합니다:

      USE_YMD: 사용일자
      SBWY_ROUT_LN_NM: 호선명
      SBWY_STNS_NM: 역명
      GTON_TNOPE: 승차인원
      GTOFF_TNOPE: 하차인원
      REG_YMDT: 등록일자
  ";

    pub fn new(client: SeoulApiClient) -> Self {
        Self { client }
    }

    /// Parameter contract advertised to clients.
    ///
    /// `date`, `subwayLineNo` and `subwayStationName` are listed as required
    /// for clients, but [`SubwayStatusParams::with_defaults`] still fills
    /// them in when they are omitted.
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
                    "description": "요청종료위치, 정수 입력 (페이징 끝번호 입니다 : 데이터 행 끝번호), 기본값 10을 사용합니다."
                },
                "date": {
                    "type": "string",
                    "description": "사용일자, YYYYMMDD 형식의 문자열."
                },
                "subwayLineNo": {
                    "type": "string",
                    "description": "한국 서울 지하철 호선명. 지하철 호선(공백시 %20으로 조회)"
                },
                "subwayStationName": {
                    "type": "string",
                    "description": "한국 서울 지하철 역명."
                }
            },
            "required": ["date", "subwayLineNo", "subwayStationName"]
        });
        Arc::new(schema.as_object().cloned().unwrap_or_default())
    }

    /// Full request URL for a resolved query.
    pub fn request_url(&self, query: &SubwayStatusQuery) -> String {
        self.client.build_url(
            URL_TEMPLATE,
            &[
                ("{StartIndex}", query.start_index.as_str()),
                ("{EndIndex}", query.end_index.as_str()),
                ("{YYYYMMDD}", query.date.as_str()),
                ("{SubwayLineNo}", query.subway_line_no.as_str()),
                ("{SubwayStationName}", query.subway_station_name.as_str()),
            ],
        )
    }

    /// Fetch ridership for a resolved query and return the dataset as JSON text.
    pub async fn fetch(&self, query: &SubwayStatusQuery) -> Result<String, ToolError> {
        info!("Calling {} with args: {:?}", Self::NAME, query);

        let url = self.request_url(query);
        let data = self.client.fetch_dataset(&url, DATASET).await?;

        Ok(data.to_string())
    }
}

#[async_trait::async_trait]
impl ToolHandler for SubwayStatusTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Create a Tool model for this tool (metadata).
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
        let params: SubwayStatusParams = parse_arguments(arguments)?;
        self.fetch(&params.with_defaults()).await
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::super::client::test_support::client_for;
    use super::*;
    use httpmock::Method::GET;
    use httpmock::MockServer;
    use serde_json::json;

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    fn sample_body() -> serde_json::Value {
        json!({
            "CardSubwayStatsNew": {
                "list_total_count": 1,
                "RESULT": { "CODE": "INFO-000", "MESSAGE": "정상 처리되었습니다" },
                "row": [{
                    "USE_YMD": "20240101",
                    "SBWY_ROUT_LN_NM": "1호선",
                    "SBWY_STNS_NM": "서울",
                    "GTON_TNOPE": 35012.0,
                    "GTOFF_TNOPE": 33007.0,
                    "REG_YMDT": "20240104"
                }]
            }
        })
    }

    #[test]
    fn test_params_defaults() {
        let query = SubwayStatusParams::default().with_defaults();
        assert_eq!(query.start_index, "1");
        assert_eq!(query.end_index, "10");
        assert_eq!(query.date, chrono::Utc::now().format("%Y%m%d").to_string());
        assert_eq!(query.subway_line_no, "1호선");
        assert_eq!(query.subway_station_name, "서울");
    }

    #[test]
    fn test_params_custom() {
        let json = r#"{
            "startIndex": 5,
            "endIndex": 20,
            "date": "20231001",
            "subwayLineNo": "2호선",
            "subwayStationName": "강남"
        }"#;
        let params: SubwayStatusParams = serde_json::from_str(json).unwrap();
        let query = params.with_defaults();
        assert_eq!(query.start_index, "5");
        assert_eq!(query.end_index, "20");
        assert_eq!(query.date, "20231001");
        assert_eq!(query.subway_line_no, "2호선");
        assert_eq!(query.subway_station_name, "강남");
    }

    #[test]
    fn test_null_treated_as_omitted() {
        let params: SubwayStatusParams =
            serde_json::from_str(r#"{"date": null, "subwayLineNo": null}"#).unwrap();
        let query = params.with_defaults();
        assert_eq!(query.subway_line_no, "1호선");
        assert_eq!(query.date.len(), 8);
    }

    #[test]
    fn test_params_float_and_string_values() {
        let params: SubwayStatusParams = serde_json::from_value(json!({
            "startIndex": 1.0,
            "endIndex": "10",
            "date": 20240101
        }))
        .unwrap();
        let query = params.with_defaults();
        assert_eq!(query.start_index, "1");
        assert_eq!(query.end_index, "10");
        assert_eq!(query.date, "20240101");
    }

    #[test]
    fn test_request_url_uses_defaults() {
        let tool = SubwayStatusTool::new(client_for("http://localhost:8088"));
        let query = SubwayStatusQuery {
            date: "20231001".to_string(),
            ..SubwayStatusParams::default().with_defaults()
        };
        assert_eq!(
            tool.request_url(&query),
            "http://localhost:8088/test-key/json/CardSubwayStatsNew/1/10/20231001/1호선/서울"
        );
    }

    #[test]
    fn test_descriptor() {
        let tool = SubwayStatusTool::new(client_for("http://localhost:8088")).to_tool();
        assert_eq!(tool.name, "KoreaSeoulSubwayStatus");
        assert_eq!(
            tool.input_schema["required"],
            json!(["date", "subwayLineNo", "subwayStationName"])
        );
        assert_eq!(tool.input_schema["properties"]["startIndex"]["type"], "number");
    }

    #[tokio::test]
    async fn test_execute_success_returns_dataset() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path_contains("/test-key/json/CardSubwayStatsNew/1/5/20240101/");
                then.status(200).json_body(sample_body());
            })
            .await;

        let tool = SubwayStatusTool::new(client_for(&server.base_url()));
        let text = tool
            .execute(args(json!({
                "startIndex": 1,
                "endIndex": 5,
                "date": "20240101",
                "subwayLineNo": "1호선",
                "subwayStationName": "서울"
            })))
            .await
            .unwrap();

        mock.assert_async().await;
        let data: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(data, sample_body()["CardSubwayStatsNew"]);
    }

    #[tokio::test]
    async fn test_execute_omitted_arguments_use_defaults() {
        let server = MockServer::start_async().await;
        let today = chrono::Utc::now().format("%Y%m%d").to_string();
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(format!(
                    "/test-key/json/CardSubwayStatsNew/1/10/{}/1%ED%98%B8%EC%84%A0/%EC%84%9C%EC%9A%B8",
                    today
                ));
                then.status(200).json_body(sample_body());
            })
            .await;

        let tool = SubwayStatusTool::new(client_for(&server.base_url()));
        let result = tool.execute(JsonObject::new()).await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_execute_accepts_float_and_string_arguments() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path(
                    "/test-key/json/CardSubwayStatsNew/1/5/20240101/2%ED%98%B8%EC%84%A0/%EA%B0%95%EB%82%A8",
                );
                then.status(200).json_body(sample_body());
            })
            .await;

        let tool = SubwayStatusTool::new(client_for(&server.base_url()));
        let result = tool
            .execute(args(json!({
                "startIndex": 1.0,
                "endIndex": "5",
                "date": 20240101,
                "subwayLineNo": "2호선",
                "subwayStationName": "강남"
            })))
            .await;

        mock.assert_async().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_execute_http_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(500);
            })
            .await;

        let tool = SubwayStatusTool::new(client_for(&server.base_url()));
        let err = tool
            .execute(args(json!({ "date": "20240101" })))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn test_execute_missing_dataset_key() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(json!({}));
            })
            .await;

        let tool = SubwayStatusTool::new(client_for(&server.base_url()));
        let err = tool
            .execute(args(json!({ "date": "20240101" })))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid response format: CardSubwayStatsNew is undefined"
        );
    }

    #[tokio::test]
    async fn test_execute_api_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).json_body(json!({
                    "CardSubwayStatsNew": {
                        "RESULT": { "CODE": "ERROR-500", "MESSAGE": "서버 오류입니다." }
                    }
                }));
            })
            .await;

        let tool = SubwayStatusTool::new(client_for(&server.base_url()));
        let err = tool
            .execute(args(json!({ "date": "20240101" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Api { .. }));
        assert_eq!(err.to_string(), "API error: ERROR-500 - 서버 오류입니다.");
    }
}

//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector describes the input, the expected request (method, headers and
//! decoded form fields), a simulated response, and either the expected parse
//! result or the expected error kind. Results are compared as JSON values so
//! number formatting and key order do not cause false negatives.

use cardbuilder_core::{
    ApiError, CardBuilderClient, ClientConfig, GalleryOptions, HttpMethod, HttpRequest,
    HttpResponse,
};
use serde_json::Value;

const ENDPOINT: &str = "http://localhost:3000/wp-admin/admin-ajax.php";

fn client() -> CardBuilderClient {
    CardBuilderClient::new(ClientConfig::with_endpoint(ENDPOINT))
}

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "POST" => HttpMethod::Post,
        other => panic!("unknown method: {other}"),
    }
}

fn pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn check_request(name: &str, req: &HttpRequest, expected: &Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.url, ENDPOINT, "{name}: url");
    assert_eq!(req.headers, pairs(&expected["headers"]), "{name}: headers");

    let form: Vec<(String, String)> = serde_urlencoded::from_str(&req.body).unwrap();
    assert_eq!(form, pairs(&expected["form"]), "{name}: form");
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_error(name: &str, err: ApiError, expected: &str) {
    match expected {
        "DeserializationError" => assert!(
            matches!(err, ApiError::DeserializationError(_)),
            "{name}: got {err:?}"
        ),
        "HttpError" => assert!(matches!(err, ApiError::HttpError { .. }), "{name}: got {err:?}"),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// getCardData
// ---------------------------------------------------------------------------

#[test]
fn get_card_data_test_vectors() {
    let raw = include_str!("../../test-vectors/get_card_data.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_u64().unwrap();

        let req = c.build_get_card_data(id).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let result = c.parse_get_card_data(simulated(case));
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            let data = result.unwrap();
            let expected = &case["expected_result"];
            assert_eq!(data.width, expected["width"].as_f64().unwrap(), "{name}: width");
            assert_eq!(data.height, expected["height"].as_f64().unwrap(), "{name}: height");
            assert_eq!(data.version, expected["version"], "{name}: version");
            assert_eq!(data.info_set, expected["infoSet"], "{name}: infoSet");
        }
    }
}

// ---------------------------------------------------------------------------
// get_gallery_cards
// ---------------------------------------------------------------------------

#[test]
fn get_gallery_cards_test_vectors() {
    let raw = include_str!("../../test-vectors/get_gallery_cards.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let options: GalleryOptions = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_get_cards(&options).unwrap();
        check_request(name, &req, &case["expected_request"]);

        let response = simulated(case);
        let body = response.body.clone();
        let result = c.parse_get_cards(response);
        if let Some(expected_error) = case.get("expected_error") {
            check_error(name, result.unwrap_err(), expected_error.as_str().unwrap());
        } else {
            // the page comes back exactly as the server sent it
            let page = result.unwrap();
            let expected: Value = serde_json::from_str(&body).unwrap();
            assert_eq!(serde_json::to_value(&page).unwrap(), expected, "{name}: parsed result");
        }
    }
}

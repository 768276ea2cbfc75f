mod support;

use support::{get, post_json, register_vehicle, send_raw, signup, spawn_server, test_config};

fn vehicle_body(rc: &str, chassis: &str, engine: &str, extra: &str) -> String {
    let mut body = format!(
        r#"{{"rcNumber":"{rc}","chassisNumber":"{chassis}","engineNumber":"{engine}""#
    );
    if !extra.is_empty() {
        body.push(',');
        body.push_str(extra);
    }
    body.push('}');
    body
}

#[tokio::test]
async fn search_finds_live_vehicles_only() {
    let addr = spawn_server(test_config()).await;
    register_vehicle(addr, &vehicle_body("MH12AB1234", "CHS-100", "ENG-100", "")).await;

    let (status, _, _) = get(addr, "/api/vehicles/search").await;
    assert_eq!(status, 400);

    let (status, _, response) = get(addr, "/api/vehicles/search?rcNumber=KA01ZZ9999").await;
    assert_eq!(status, 404);
    let err: serde_json::Value = serde_json::from_str(&response).expect("error json");
    assert_eq!(err["error"]["message"], "RC number not found in database");

    // lowercase input normalizes to the stored RC
    let (status, _, response) = get(addr, "/api/vehicles/search?rcNumber=mh12ab1234").await;
    assert_eq!(status, 200, "{response}");
    let vehicle: serde_json::Value = serde_json::from_str(&response).expect("vehicle json");
    assert_eq!(vehicle["rcNumber"], "MH12AB1234");
    assert_eq!(vehicle["stolen"], false);
}

#[tokio::test]
async fn fraud_check_requires_auth_and_scores_clean_vehicle_verified() {
    let addr = spawn_server(test_config()).await;
    let id = register_vehicle(addr, &vehicle_body("MH12AB0001", "CHS-A", "ENG-A", "")).await;

    let body = format!(r#"{{"vehicleId":"{id}"}}"#);
    let (status, _, _) = post_json(addr, "/api/vehicles/fraud-check", &[], &body).await;
    assert_eq!(status, 401);

    let token = signup(addr, "checker@example.com").await;
    let auth = format!("Bearer {token}");
    let (status, _, response) =
        post_json(addr, "/api/vehicles/fraud-check", &[("Authorization", &auth)], &body).await;
    assert_eq!(status, 200, "{response}");
    let report: serde_json::Value = serde_json::from_str(&response).expect("report json");
    assert_eq!(report["fraudScore"], 0.0);
    assert_eq!(report["result"], "verified");
    assert!(report["fraudChecks"].as_array().is_some_and(Vec::is_empty));
}

#[tokio::test]
async fn fraud_check_flags_duplicates_and_stolen() {
    let addr = spawn_server(test_config()).await;
    // two live vehicles share a chassis serial
    register_vehicle(addr, &vehicle_body("MH12AB0002", "CHS-DUP", "ENG-B", "")).await;
    let id = register_vehicle(
        addr,
        &vehicle_body("MH12AB0003", "CHS-DUP", "ENG-C", r#""stolen":true"#),
    )
    .await;

    let token = signup(addr, "inspector@example.com").await;
    let auth = format!("Bearer {token}");
    let body = format!(r#"{{"vehicleId":"{id}"}}"#);
    let (status, _, response) =
        post_json(addr, "/api/vehicles/fraud-check", &[("Authorization", &auth)], &body).await;
    assert_eq!(status, 200, "{response}");
    let report: serde_json::Value = serde_json::from_str(&response).expect("report json");

    // 0.4 (duplicate chassis) + 1.0 (stolen) caps at 1.0
    assert_eq!(report["fraudScore"], 1.0);
    assert_eq!(report["result"], "suspicious");
    let types: Vec<&str> = report["fraudChecks"]
        .as_array()
        .expect("checks")
        .iter()
        .filter_map(|c| c["type"].as_str())
        .collect();
    assert_eq!(types, vec!["Duplicate Chassis", "Stolen Vehicle"]);
    let messages: Vec<&str> = report["fraudChecks"]
        .as_array()
        .expect("checks")
        .iter()
        .filter_map(|c| c["message"].as_str())
        .collect();
    assert_eq!(
        messages,
        vec!["Chassis number found in 2 vehicles", "Vehicle reported as stolen"]
    );

    // every triggered check persisted one flag
    let path = format!("/api/vehicles/{id}/flags");
    let (status, _, response) =
        send_raw(addr, "GET", &path, &[("Authorization", &auth)], None).await;
    assert_eq!(status, 200, "{response}");
    let flags: serde_json::Value = serde_json::from_str(&response).expect("flags json");
    let flag_types: Vec<&str> = flags
        .as_array()
        .expect("flag array")
        .iter()
        .filter_map(|f| f["flagType"].as_str())
        .collect();
    assert_eq!(flag_types.len(), 2);
    assert!(flag_types.contains(&"duplicate_chassis"));
    assert!(flag_types.contains(&"stolen_vehicle"));

    // and the run itself landed in the verification history
    let path = format!("/api/vehicles/{id}/verifications");
    let (status, _, response) =
        send_raw(addr, "GET", &path, &[("Authorization", &auth)], None).await;
    assert_eq!(status, 200, "{response}");
    let verifications: serde_json::Value =
        serde_json::from_str(&response).expect("verifications json");
    let first = &verifications.as_array().expect("array")[0];
    assert_eq!(first["verificationType"], "manual_search");
    assert_eq!(first["result"], "suspicious");
}

#[tokio::test]
async fn fraud_check_unknown_vehicle_is_404() {
    let addr = spawn_server(test_config()).await;
    let token = signup(addr, "nobody@example.com").await;
    let auth = format!("Bearer {token}");

    let (status, _, _) = post_json(
        addr,
        "/api/vehicles/fraud-check",
        &[("Authorization", &auth)],
        r#"{"vehicleId":"ffffffffffffffffffffffff"}"#,
    )
    .await;
    assert_eq!(status, 404);

    let (status, _, _) = post_json(
        addr,
        "/api/vehicles/fraud-check",
        &[("Authorization", &auth)],
        r#"{"vehicleId":"not-a-doc-id"}"#,
    )
    .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn expired_documents_raise_concerns_not_suspicion() {
    let addr = spawn_server(test_config()).await;
    // PUC expired long ago: weight 0.1, verdict stays at "concerns"
    let id = register_vehicle(
        addr,
        &vehicle_body(
            "MH12AB0004",
            "CHS-E",
            "ENG-E",
            r#""puc":{"certificateNumber":"P-1","validTill":"2000-01-01"}"#,
        ),
    )
    .await;

    let token = signup(addr, "pucchecker@example.com").await;
    let auth = format!("Bearer {token}");
    let body = format!(r#"{{"vehicleId":"{id}"}}"#);
    let (status, _, response) =
        post_json(addr, "/api/vehicles/fraud-check", &[("Authorization", &auth)], &body).await;
    assert_eq!(status, 200, "{response}");
    let report: serde_json::Value = serde_json::from_str(&response).expect("report json");
    assert_eq!(report["result"], "concerns");
    assert_eq!(report["fraudChecks"][0]["type"], "Expired PUC");
    assert_eq!(report["fraudChecks"][0]["severity"], "low");
}

#[tokio::test]
async fn authenticated_search_is_logged_as_verification() {
    let addr = spawn_server(test_config()).await;
    let id = register_vehicle(addr, &vehicle_body("MH12AB0005", "CHS-F", "ENG-F", "")).await;
    let token = signup(addr, "browser@example.com").await;
    let auth = format!("Bearer {token}");

    // anonymous search leaves no trail
    let (status, _, _) = get(addr, "/api/vehicles/search?rcNumber=MH12AB0005").await;
    assert_eq!(status, 200);

    let (status, _, _) = send_raw(
        addr,
        "GET",
        "/api/vehicles/search?rcNumber=MH12AB0005",
        &[("Authorization", &auth)],
        None,
    )
    .await;
    assert_eq!(status, 200);

    let path = format!("/api/vehicles/{id}/verifications");
    let (status, _, response) =
        send_raw(addr, "GET", &path, &[("Authorization", &auth)], None).await;
    assert_eq!(status, 200, "{response}");
    let verifications: serde_json::Value =
        serde_json::from_str(&response).expect("verifications json");
    assert_eq!(verifications.as_array().expect("array").len(), 1);
    assert_eq!(verifications[0]["result"], "verified");

    // paging past the single entry comes back empty
    let path = format!("/api/vehicles/{id}/verifications?offset=1");
    let (status, _, response) =
        send_raw(addr, "GET", &path, &[("Authorization", &auth)], None).await;
    assert_eq!(status, 200, "{response}");
    let rest: serde_json::Value = serde_json::from_str(&response).expect("verifications json");
    assert!(rest.as_array().expect("array").is_empty());
}

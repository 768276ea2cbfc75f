mod support;

use support::{get, post_json, register_vehicle, send_raw, spawn_server, test_config, ADMIN_KEY};

fn body(rc: &str, chassis: &str, engine: &str) -> String {
    format!(r#"{{"rcNumber":"{rc}","chassisNumber":"{chassis}","engineNumber":"{engine}"}}"#)
}

#[tokio::test]
async fn admin_writes_require_the_shared_key() {
    let addr = spawn_server(test_config()).await;
    let payload = body("MH12AB1111", "CHS-1", "ENG-1");

    let (status, _, _) = post_json(addr, "/api/rc", &[], &payload).await;
    assert_eq!(status, 403);
    let (status, _, _) =
        post_json(addr, "/api/rc", &[("x-admin-key", "wrong-key")], &payload).await;
    assert_eq!(status, 403);
    let (status, _, _) =
        post_json(addr, "/api/rc", &[("x-admin-key", ADMIN_KEY)], &payload).await;
    assert_eq!(status, 201);
}

#[tokio::test]
async fn writes_stay_disabled_when_no_admin_key_is_configured() {
    let mut api = test_config();
    api.admin_key = None;
    let addr = spawn_server(api).await;

    let (status, _, _) = post_json(
        addr,
        "/api/rc",
        &[("x-admin-key", ADMIN_KEY)],
        &body("MH12AB2222", "CHS-2", "ENG-2"),
    )
    .await;
    assert_eq!(status, 403);
}

#[tokio::test]
async fn create_then_read_update_delete_lifecycle() {
    let addr = spawn_server(test_config()).await;
    let id = register_vehicle(addr, &body("MH12AB3333", "CHS-3", "ENG-3")).await;

    let path = format!("/api/rc/{id}");
    let (status, _, response) = get(addr, &path).await;
    assert_eq!(status, 200, "{response}");
    let vehicle: serde_json::Value = serde_json::from_str(&response).expect("vehicle json");
    assert_eq!(vehicle["rcNumber"], "MH12AB3333");
    assert_eq!(vehicle["ownersCount"], 1);

    // merge update: new owner block, identity keys unchanged
    let update = r#"{"rcNumber":"MH12AB3333","chassisNumber":"CHS-3","engineNumber":"ENG-3",
        "ownersCount":2,"owner":{"name":"B Buyer","phone":null,"email":null,"address":null,"aadhaarLast4":null}}"#;
    let (status, _, response) = send_raw(
        addr,
        "PUT",
        &path,
        &[("x-admin-key", ADMIN_KEY)],
        Some(update),
    )
    .await;
    assert_eq!(status, 200, "{response}");
    let updated: serde_json::Value = serde_json::from_str(&response).expect("updated json");
    assert_eq!(updated["ownersCount"], 2);
    assert_eq!(updated["owner"]["name"], "B Buyer");

    let (status, _, _) = send_raw(addr, "DELETE", &path, &[("x-admin-key", ADMIN_KEY)], None).await;
    assert_eq!(status, 204);

    // soft-deleted records vanish from every read path
    let (status, _, _) = get(addr, &path).await;
    assert_eq!(status, 404);
    let (status, _, _) = get(addr, "/api/rc/search?rcNumber=MH12AB3333").await;
    assert_eq!(status, 404);

    // the RC becomes reusable once its old record is gone
    let (status, _, _) = post_json(
        addr,
        "/api/rc",
        &[("x-admin-key", ADMIN_KEY)],
        &body("MH12AB3333", "CHS-3B", "ENG-3B"),
    )
    .await;
    assert_eq!(status, 201);
}

#[tokio::test]
async fn duplicate_rc_conflicts_and_bad_payload_fails_validation() {
    let addr = spawn_server(test_config()).await;
    register_vehicle(addr, &body("MH12AB4444", "CHS-4", "ENG-4")).await;

    let (status, _, response) = post_json(
        addr,
        "/api/rc",
        &[("x-admin-key", ADMIN_KEY)],
        &body("MH12AB4444", "CHS-5", "ENG-5"),
    )
    .await;
    assert_eq!(status, 409, "{response}");

    let (status, _, _) = post_json(
        addr,
        "/api/rc",
        &[("x-admin-key", ADMIN_KEY)],
        &body("!", "CHS-6", "ENG-6"),
    )
    .await;
    assert_eq!(status, 422);

    let prehistoric = r#"{"rcNumber":"MH12AB5555","chassisNumber":"CHS-7","engineNumber":"ENG-7",
        "vehicleInfo":{"type":null,"make":null,"model":null,"variant":null,"fuelType":null,"color":null,"manufactureYear":1850}}"#;
    let (status, _, _) = post_json(
        addr,
        "/api/rc",
        &[("x-admin-key", ADMIN_KEY)],
        prehistoric,
    )
    .await;
    assert_eq!(status, 422);
}

#[tokio::test]
async fn listing_pages_through_live_vehicles() {
    let addr = spawn_server(test_config()).await;
    for n in 0..3 {
        register_vehicle(addr, &body(&format!("MH12AB600{n}"), &format!("CHS-8{n}"), &format!("ENG-8{n}"))).await;
    }

    let (status, _, response) = get(addr, "/api/rc?limit=2").await;
    assert_eq!(status, 200, "{response}");
    let page: serde_json::Value = serde_json::from_str(&response).expect("page json");
    assert_eq!(page["total"], 3);
    assert_eq!(page["items"].as_array().expect("items").len(), 2);

    let (status, _, response) = get(addr, "/api/rc?limit=2&offset=2").await;
    assert_eq!(status, 200);
    let page: serde_json::Value = serde_json::from_str(&response).expect("page json");
    assert_eq!(page["items"].as_array().expect("items").len(), 1);

    let (status, _, _) = get(addr, "/api/rc?limit=bogus").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn configured_page_bounds_cap_listing_requests() {
    let mut api = test_config();
    api.default_page_limit = 1;
    api.max_page_limit = 2;
    let addr = spawn_server(api).await;
    for n in 0..3 {
        register_vehicle(
            addr,
            &body(&format!("KA01ZZ900{n}"), &format!("CHS-9{n}"), &format!("ENG-9{n}")),
        )
        .await;
    }

    // no limit param: the configured default applies
    let (status, _, response) = get(addr, "/api/rc").await;
    assert_eq!(status, 200, "{response}");
    let page: serde_json::Value = serde_json::from_str(&response).expect("page json");
    assert_eq!(page["limit"], 1);
    assert_eq!(page["items"].as_array().expect("items").len(), 1);

    // an oversized limit clamps to the configured ceiling
    let (status, _, response) = get(addr, "/api/rc?limit=50").await;
    assert_eq!(status, 200);
    let page: serde_json::Value = serde_json::from_str(&response).expect("page json");
    assert_eq!(page["limit"], 2);
    assert_eq!(page["items"].as_array().expect("items").len(), 2);
}

#[tokio::test]
async fn resolve_flag_and_audit_trail_are_admin_gated() {
    let addr = spawn_server(test_config()).await;
    let id = register_vehicle(addr, &body("MH12AB7777", "CHS-9", "ENG-9")).await;

    // trigger a flag through a fraud check
    let token = support::signup(addr, "auditor@example.com").await;
    let auth = format!("Bearer {token}");
    let stolen =
        r#"{"rcNumber":"MH12AB7777","chassisNumber":"CHS-9","engineNumber":"ENG-9","stolen":true}"#;
    let path = format!("/api/rc/{id}");
    let (status, _, _) = send_raw(
        addr,
        "PUT",
        &path,
        &[("x-admin-key", ADMIN_KEY)],
        Some(stolen),
    )
    .await;
    assert_eq!(status, 200);
    let check = format!(r#"{{"vehicleId":"{id}"}}"#);
    let (status, _, _) =
        post_json(addr, "/api/vehicles/fraud-check", &[("Authorization", &auth)], &check).await;
    assert_eq!(status, 200);

    let flags_path = format!("/api/vehicles/{id}/flags?resolved=false");
    let (status, _, response) =
        send_raw(addr, "GET", &flags_path, &[("Authorization", &auth)], None).await;
    assert_eq!(status, 200, "{response}");
    let flags: serde_json::Value = serde_json::from_str(&response).expect("flags json");
    let flag_id = flags[0]["id"].as_str().expect("flag id").to_string();

    let resolve_path = format!("/api/flags/{flag_id}/resolve");
    let (status, _, _) = post_json(addr, &resolve_path, &[], r#"{"notes":"recovered"}"#).await;
    assert_eq!(status, 403);
    let (status, _, response) = post_json(
        addr,
        &resolve_path,
        &[("x-admin-key", ADMIN_KEY)],
        r#"{"notes":"recovered"}"#,
    )
    .await;
    assert_eq!(status, 200, "{response}");
    let resolved: serde_json::Value = serde_json::from_str(&response).expect("resolved json");
    assert_eq!(resolved["resolved"], true);
    assert_eq!(resolved["resolutionNotes"], "recovered");

    let (status, _, _) = get(addr, "/api/audit").await;
    assert_eq!(status, 403);
    let (status, _, response) =
        send_raw(addr, "GET", "/api/audit", &[("x-admin-key", ADMIN_KEY)], None).await;
    assert_eq!(status, 200, "{response}");
    let audit: serde_json::Value = serde_json::from_str(&response).expect("audit json");
    // create, signup, update, fraud-check read, flag resolution
    assert!(audit["total"].as_u64().expect("total") >= 4);
    let actions: Vec<&str> = audit["items"]
        .as_array()
        .expect("entries")
        .iter()
        .filter_map(|e| e["action"].as_str())
        .collect();
    assert!(actions.contains(&"UPDATE"));
    assert!(actions.contains(&"CREATE"));
}

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{spawn_app, TestApp};

struct Branch {
    company: String,
    office: String,
}

async fn branch(app: &TestApp, admin: &str, name: &str) -> anyhow::Result<Branch> {
    let company = app.create("/api/v1/company", Some(admin), json!({ "name": name })).await?;
    let office = app
        .create("/api/v1/office", Some(admin), json!({ "company_id": company, "location": format!("{name} HQ") }))
        .await?;
    Ok(Branch { company, office })
}

async fn hire(app: &TestApp, admin: &str, email: &str, role: &str, office: &str) -> anyhow::Result<String> {
    app.create(
        "/api/v1/employee",
        Some(admin),
        json!({ "name": email, "email": email, "phone": "+359", "password": "staff-pass", "role": role, "office_id": office }),
    )
    .await
}

fn parcel(sender: &str, receiver: &str, office: &str, courier: Option<&str>) -> Value {
    json!({
        "sender_id": sender,
        "receiver_id": receiver,
        "courier_id": courier,
        "office_accepted_at_id": office,
        "office_delivered_at_id": office,
        "is_delivered_to_office": true,
        "weight": 2.0
    })
}

#[tokio::test]
async fn deleting_a_courier_hands_packages_to_a_colleague() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let b = branch(&app, &admin, "Speedy").await?;
    let leaving = hire(&app, &admin, "x@speedy.bg", "courier", &b.office).await?;
    let staying = hire(&app, &admin, "y@speedy.bg", "courier", &b.office).await?;
    let client = app.register_client("Sender", "sender@example.com").await?;

    let mut parcels = Vec::new();
    for _ in 0..3 {
        parcels.push(app.create("/api/v1/package", Some(&admin), parcel(&client, &client, &b.office, Some(&leaving))).await?);
    }

    let (status, body) = app.send(Method::DELETE, &format!("/api/v1/employee/{leaving}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["reassigned"], 3);

    for id in parcels {
        let (_, p) = app.send(Method::GET, &format!("/api/v1/package/{id}"), Some(&admin), None).await?;
        assert_eq!(p["courier_id"], staying.as_str());
    }
    let (status, _) = app.send(Method::GET, &format!("/api/v1/employee/{leaving}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn deleting_an_only_courier_with_packages_conflicts() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let b = branch(&app, &admin, "Econt").await?;
    let only = hire(&app, &admin, "solo@econt.bg", "courier", &b.office).await?;
    // Same role, other company: not a candidate.
    let other = branch(&app, &admin, "Elsewhere").await?;
    hire(&app, &admin, "far@elsewhere.bg", "courier", &other.office).await?;
    let client = app.register_client("Sender", "s@example.com").await?;
    let id = app.create("/api/v1/package", Some(&admin), parcel(&client, &client, &b.office, Some(&only))).await?;

    let (status, body) = app.send(Method::DELETE, &format!("/api/v1/employee/{only}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "No Replacement Available");

    let (_, p) = app.send(Method::GET, &format!("/api/v1/package/{id}"), Some(&admin), None).await?;
    assert_eq!(p["courier_id"], only.as_str());
    Ok(())
}

#[tokio::test]
async fn admins_are_protected_from_deletion() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let (_, me) = app.send(Method::GET, "/api/v1/me", Some(&admin), None).await?;
    let admin_id = me["id"].as_str().unwrap_or_default().to_string();

    let (status, body) = app.send(Method::DELETE, &format!("/api/v1/employee/{admin_id}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Protected Entity");
    Ok(())
}

#[tokio::test]
async fn deleting_the_last_office_conflicts_and_keeps_it() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let b = branch(&app, &admin, "Lonely").await?;
    hire(&app, &admin, "clerk@lonely.bg", "employee", &b.office).await?;

    let (status, body) = app.send(Method::DELETE, &format!("/api/v1/office/{}", b.office), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "No Replacement Available");

    let (status, _) = app.send(Method::GET, &format!("/api/v1/office/{}", b.office), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn deleting_an_office_moves_staff_to_a_sibling() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let b = branch(&app, &admin, "Twin").await?;
    let sibling = app
        .create("/api/v1/office", Some(&admin), json!({ "company_id": b.company, "location": "Twin East" }))
        .await?;
    let clerk = hire(&app, &admin, "clerk@twin.bg", "employee", &b.office).await?;

    let (status, body) = app.send(Method::DELETE, &format!("/api/v1/office/{}", b.office), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["reassigned"], 1);

    let (_, e) = app.send(Method::GET, &format!("/api/v1/employee/{clerk}"), Some(&admin), None).await?;
    assert_eq!(e["office_id"], sibling.as_str());
    assert!(e.get("password_hash").is_none());

    let (status, body) = app.send(Method::DELETE, &format!("/api/v1/company/{}", b.company), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    Ok(())
}

#[tokio::test]
async fn clients_only_see_their_own_packages() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let b = branch(&app, &admin, "Box").await?;
    let alice = app.register_client("Alice", "alice@example.com").await?;
    let bob = app.register_client("Bob", "bob@example.com").await?;
    app.register_client("Eve", "eve@example.com").await?;
    let id = app.create("/api/v1/package", Some(&admin), parcel(&alice, &bob, &b.office, None)).await?;

    let alice_token = app.login("alice@example.com", "client-pass").await?;
    let (status, sent) = app.send(Method::GET, &format!("/api/v1/package/sender/{alice}"), Some(&alice_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(sent.as_array().map(Vec::len), Some(1));
    let (status, _) = app.send(Method::GET, &format!("/api/v1/package/receiver/{bob}"), Some(&alice_token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let bob_token = app.login("bob@example.com", "client-pass").await?;
    let (status, p) = app.send(Method::GET, &format!("/api/v1/package/{id}"), Some(&bob_token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(p["price"], 9.98);

    let eve_token = app.login("eve@example.com", "client-pass").await?;
    let (status, _) = app.send(Method::GET, &format!("/api/v1/package/{id}"), Some(&eve_token), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn couriers_deliver_but_cannot_edit() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let b = branch(&app, &admin, "Fast").await?;
    hire(&app, &admin, "run@fast.bg", "courier", &b.office).await?;
    let client = app.register_client("C", "c@example.com").await?;
    let id = app.create("/api/v1/package", Some(&admin), parcel(&client, &client, &b.office, None)).await?;

    let courier = app.login("run@fast.bg", "staff-pass").await?;
    let (status, _) = app
        .send(Method::PATCH, &format!("/api/v1/package/{id}"), Some(&courier), Some(json!({ "weight": 5.0 })))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, p) = app.send(Method::POST, &format!("/api/v1/package/{id}/deliver"), Some(&courier), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(p["delivery_status"], "delivered");

    let (_, pending) = app.send(Method::GET, "/api/v1/package/not-delivered", Some(&courier), None).await?;
    assert_eq!(pending.as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn lists_are_paginated() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    for name in ["A", "B", "C"] {
        app.create("/api/v1/company", Some(&admin), json!({ "name": name })).await?;
    }
    let (_, page) = app.send(Method::GET, "/api/v1/company?limit=2&offset=1", Some(&admin), None).await?;
    let names: Vec<&str> = page.as_array().into_iter().flatten().filter_map(|c| c["name"].as_str()).collect();
    assert_eq!(names, ["B", "C"]);

    let (status, found) = app.send(Method::GET, "/api/v1/company/search/B", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn employees_cannot_promote_themselves() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let admin = app.admin_token().await?;
    let b = branch(&app, &admin, "Self").await?;
    let me = hire(&app, &admin, "me@self.bg", "employee", &b.office).await?;
    let token = app.login("me@self.bg", "staff-pass").await?;

    let (status, _) = app
        .send(Method::PATCH, &format!("/api/v1/employee/{me}"), Some(&token), Some(json!({ "role": "admin" })))
        .await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = app
        .send(Method::PATCH, &format!("/api/v1/employee/{me}"), Some(&token), Some(json!({ "phone": "+359 2 000" })))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phone"], "+359 2 000");
    Ok(())
}

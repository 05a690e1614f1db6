use sea_orm::ConnectionTrait;
use serde_json::json;

use crate::common::{TestApp, TestFile, routes};

#[tokio::test]
async fn create_then_list_contains_record() {
    let app = TestApp::spawn().await;

    let res = app.add(Some("cat"), vec![TestFile::png("cat.png")]).await;
    res.assert_success("Record created successfully");

    let records = app.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["description"], "cat");
    assert!(records[0]["photo"].as_str().unwrap().ends_with("cat.png"));
    assert!(records[0]["id"].is_i64());
    assert_eq!(app.stored_files(), ["cat.png"]);
}

#[tokio::test]
async fn create_makes_one_record_per_file() {
    let app = TestApp::spawn().await;

    let res = app
        .add(
            Some("holiday"),
            vec![
                TestFile::png("beach.png"),
                TestFile::new("sunset.JPG", "image/jpeg"),
                TestFile::new("wave.gif", "image/gif"),
            ],
        )
        .await;
    res.assert_success("Record created successfully");

    let records = app.records().await;
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r["description"] == "holiday"));

    let mut photos: Vec<&str> = records.iter().map(|r| r["photo"].as_str().unwrap()).collect();
    photos.dedup();
    assert_eq!(photos.len(), 3);
    assert!(photos[0].ends_with("beach.png"));
    assert!(photos[1].ends_with("sunset.JPG"));
    assert!(photos[2].ends_with("wave.gif"));
}

#[tokio::test]
async fn create_without_description_stores_null() {
    let app = TestApp::spawn().await;

    app.add(None, vec![TestFile::png("plain.png")])
        .await
        .assert_success("Record created successfully");

    let records = app.records().await;
    assert!(records[0]["description"].is_null());
}

#[tokio::test]
async fn create_rejects_non_image() {
    let app = TestApp::spawn().await;

    let res = app
        .add(
            Some("bad"),
            vec![TestFile::new("virus.exe", "application/octet-stream")],
        )
        .await;
    res.assert_failure("Record creation failed");

    assert!(app.records().await.is_empty());
    assert!(app.stored_files().is_empty());
    assert_eq!(app.staged_count(), 0);
}

#[tokio::test]
async fn create_rejects_mismatched_content_type() {
    let app = TestApp::spawn().await;

    app.add(Some("x"), vec![TestFile::new("cat.png", "text/plain")])
        .await
        .assert_failure("Record creation failed");
    app.add(Some("x"), vec![TestFile::new("cat.txt", "image/png")])
        .await
        .assert_failure("Record creation failed");

    assert!(app.records().await.is_empty());
}

#[tokio::test]
async fn one_bad_file_rejects_the_whole_batch() {
    let app = TestApp::spawn().await;

    let res = app
        .add(
            Some("mixed"),
            vec![
                TestFile::png("good.png"),
                TestFile::new("virus.exe", "application/x-msdownload"),
            ],
        )
        .await;
    res.assert_failure("Record creation failed");

    assert!(app.records().await.is_empty());
    assert!(app.stored_files().is_empty());
    assert_eq!(app.staged_count(), 0);
}

#[tokio::test]
async fn create_rejects_more_than_five_files() {
    let app = TestApp::spawn().await;
    let names = ["1.png", "2.png", "3.png", "4.png", "5.png", "6.png"];

    let res = app
        .add(Some("many"), names.into_iter().map(TestFile::png).collect())
        .await;
    res.assert_failure("Record creation failed");

    assert!(app.records().await.is_empty());
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn create_accepts_exactly_five_files() {
    let app = TestApp::spawn().await;
    let names = ["1.png", "2.png", "3.png", "4.png", "5.png"];

    app.add(Some("five"), names.into_iter().map(TestFile::png).collect())
        .await
        .assert_success("Record created successfully");

    assert_eq!(app.records().await.len(), 5);
}

#[tokio::test]
async fn create_rejects_oversized_file() {
    let app = TestApp::spawn_with(|config| config.upload.max_file_size = 16).await;

    let big = TestFile {
        name: "big.png",
        mime: "image/png",
        bytes: vec![0u8; 17],
    };
    app.add(Some("big"), vec![big])
        .await
        .assert_failure("Record creation failed");
    assert!(app.stored_files().is_empty());
    assert_eq!(app.staged_count(), 0);

    let small = TestFile {
        name: "small.png",
        mime: "image/png",
        bytes: vec![0u8; 16],
    };
    app.add(Some("small"), vec![small])
        .await
        .assert_success("Record created successfully");

    assert_eq!(app.records().await.len(), 1);
    assert_eq!(app.stored_files(), ["small.png"]);
}

#[tokio::test]
async fn create_rejects_zero_files() {
    let app = TestApp::spawn().await;

    app.add(Some("nothing"), vec![])
        .await
        .assert_failure("Record creation failed");

    assert!(app.records().await.is_empty());
}

#[tokio::test]
async fn create_rejects_files_under_other_field() {
    let app = TestApp::spawn().await;
    let part = reqwest::multipart::Part::bytes(b"img".to_vec())
        .file_name("cat.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::multipart::Form::new()
        .text("description", "cat")
        .part("avatar", part);

    let res = app
        .send_form(app.client.post(format!("http://{}{}", app.addr, routes::ADD)), form)
        .await;
    res.assert_failure("Record creation failed");
    assert!(app.records().await.is_empty());
}

#[tokio::test]
async fn create_rejects_non_multipart_body() {
    let app = TestApp::spawn().await;

    app.post_json(routes::ADD, &json!({ "description": "cat" }))
        .await
        .assert_failure("Record creation failed");
}

#[tokio::test]
async fn create_accepts_leading_dot_names() {
    let app = TestApp::spawn().await;

    app.add(Some("dotted"), vec![TestFile::png(".holiday.png")])
        .await
        .assert_success("Record created successfully");

    assert_eq!(app.stored_files(), [".holiday.png"]);
    assert!(app.records().await[0]["photo"]
        .as_str()
        .unwrap()
        .ends_with(".holiday.png"));
}

#[tokio::test]
async fn same_name_overwrites_stored_file() {
    let app = TestApp::spawn().await;

    let first = TestFile {
        name: "dup.png",
        mime: "image/png",
        bytes: b"first".to_vec(),
    };
    let second = TestFile {
        name: "dup.png",
        mime: "image/png",
        bytes: b"second".to_vec(),
    };
    app.add(Some("one"), vec![first]).await;
    app.add(Some("two"), vec![second]).await;

    let records = app.records().await;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["photo"], records[1]["photo"]);
    assert_eq!(std::fs::read(app.upload_dir.join("dup.png")).unwrap(), b"second");
}

#[tokio::test]
async fn get_returns_record() {
    let app = TestApp::spawn().await;
    app.add(Some("dog"), vec![TestFile::png("dog.png")]).await;
    let id = app.records().await[0]["id"].as_i64().unwrap();

    let res = app.get(&routes::record(id)).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], true);
    assert_eq!(res.body["data"]["id"], id);
    assert_eq!(res.body["data"]["description"], "dog");
    assert!(res.body["data"]["photo"].as_str().unwrap().ends_with("dog.png"));
}

#[tokio::test]
async fn get_unknown_id_is_not_found() {
    let app = TestApp::spawn().await;

    app.get(&routes::record(99999))
        .await
        .assert_failure("Record not found");
    app.get(&routes::record("not-a-number"))
        .await
        .assert_failure("Record not found");
}

#[tokio::test]
async fn update_replaces_description_and_photos() {
    let app = TestApp::spawn().await;
    app.add(Some("before"), vec![TestFile::png("old.png")]).await;
    let id = app.records().await[0]["id"].as_i64().unwrap();

    let res = app
        .update(
            id,
            Some("after"),
            vec![TestFile::png("new1.png"), TestFile::new("new2.jpeg", "image/jpeg")],
        )
        .await;
    res.assert_success("Record updated successfully");

    let record = app.get(&routes::record(id)).await.body["data"].clone();
    assert_eq!(record["description"], "after");
    let photo = record["photo"].as_str().unwrap();
    let paths: Vec<&str> = photo.split(',').collect();
    assert_eq!(paths.len(), 2);
    assert!(paths[0].ends_with("new1.png"));
    assert!(paths[1].ends_with("new2.jpeg"));
    assert!(!photo.contains("old.png"));

    // Still a single record.
    assert_eq!(app.records().await.len(), 1);
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app
        .update(99999, Some("ghost"), vec![TestFile::png("ghost.png")])
        .await;
    res.assert_failure("Record not found");

    assert!(app.stored_files().is_empty());
    assert_eq!(app.staged_count(), 0);
}

#[tokio::test]
async fn update_rejects_non_image_and_keeps_record() {
    let app = TestApp::spawn().await;
    app.add(Some("keep"), vec![TestFile::png("keep.png")]).await;
    let id = app.records().await[0]["id"].as_i64().unwrap();

    app.update(id, Some("changed"), vec![TestFile::new("evil.sh", "text/x-shellscript")])
        .await
        .assert_failure("Record update failed");

    let record = app.get(&routes::record(id)).await.body["data"].clone();
    assert_eq!(record["description"], "keep");
    assert!(record["photo"].as_str().unwrap().ends_with("keep.png"));
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = TestApp::spawn().await;
    app.add(Some("temp"), vec![TestFile::png("temp.png")]).await;
    let id = app.records().await[0]["id"].as_i64().unwrap();

    app.delete(&routes::delete(id))
        .await
        .assert_success("Record deleted successfully");

    app.get(&routes::record(id))
        .await
        .assert_failure("Record not found");
    assert!(app.records().await.is_empty());
    // Deleting a record does not touch the stored file.
    assert_eq!(app.stored_files(), ["temp.png"]);
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let app = TestApp::spawn().await;

    app.delete(&routes::delete(99999))
        .await
        .assert_failure("Record not found");
}

#[tokio::test]
async fn list_returns_each_record_once() {
    let app = TestApp::spawn().await;
    app.add(Some("a"), vec![TestFile::png("a.png"), TestFile::png("b.png")])
        .await;
    app.add(Some("b"), vec![TestFile::png("c.png")]).await;
    let first = app.records().await[0]["id"].as_i64().unwrap();
    app.delete(&routes::delete(first)).await;

    let records = app.records().await;
    let mut ids: Vec<i64> = records.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids.len(), 2);
    ids.dedup();
    assert_eq!(ids.len(), 2);
    assert!(!ids.contains(&first));
}

#[tokio::test]
async fn uploaded_files_are_served_statically() {
    let app = TestApp::spawn().await;
    let file = TestFile {
        name: "served.png",
        mime: "image/png",
        bytes: b"\x89PNG fake".to_vec(),
    };
    app.add(Some("served"), vec![file]).await;

    let res = app.get("/public/served.png").await;

    assert_eq!(res.status, 200);
    assert_eq!(res.bytes, b"\x89PNG fake");
}

#[tokio::test]
async fn database_failures_use_generic_messages() {
    let app = TestApp::spawn().await;
    app.add(Some("seed"), vec![TestFile::png("seed.png")])
        .await
        .assert_success("Record created successfully");
    let id = app.records().await[0]["id"].as_i64().unwrap();

    app.db
        .execute_unprepared("DROP TABLE photos")
        .await
        .expect("Failed to drop table");

    app.get(routes::LIST)
        .await
        .assert_failure("Error fetching records");
    app.get(&routes::record(id))
        .await
        .assert_failure("Error fetching record");
    app.delete(&routes::delete(id))
        .await
        .assert_failure("Record deletion failed");
    app.update(id, Some("new"), vec![TestFile::png("new.png")])
        .await
        .assert_failure("Record update failed");
    app.add(Some("orphan"), vec![TestFile::png("orphan.png")])
        .await
        .assert_failure("Record creation failed");

    // The create stored its file before the insert failed; the update never
    // got that far.
    assert_eq!(app.stored_files(), ["orphan.png", "seed.png"]);
    assert_eq!(app.staged_count(), 0);
}

//! Instance lifecycle: construction, start/close/destroy, settings.

mod support;

use tokio::time::Duration;

use storyplayer::{
    ItemState, MediaKind, Player, PlayerConfig, PlayerError, PlayerEvent, PlayerState,
};

use support::{drain, drain_tags, image, video, RecordingHost};

fn config(id: &str) -> PlayerConfig {
    PlayerConfig {
        id: Some(id.to_string()),
        ..PlayerConfig::default()
    }
}

#[test]
fn construction_builds_items_and_registers() {
    let host = RecordingHost::new();
    let player = Player::new(
        vec![image("a", 3.0), video("b")],
        config("lifecycle-construction"),
        host,
    )
    .unwrap();

    assert_eq!(player.state(), PlayerState::Closed);
    assert_eq!(player.current_item(), None);
    assert_eq!(player.order(), vec!["a".to_string(), "b".to_string()]);

    let items = player.items();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].kind, MediaKind::Image);
    assert_eq!(items[0].state, ItemState::Closed);
    assert!(items[0].loading);
    assert_eq!(items[0].duration_secs, Some(3.0));
    assert_eq!(items[1].kind, MediaKind::Video);
    assert_eq!(items[1].duration_secs, None);

    let looked_up = Player::instance("lifecycle-construction").unwrap();
    assert_eq!(looked_up.id(), player.id());
    assert!(storyplayer::registry::ids().contains(&"lifecycle-construction".to_string()));

    player.destroy();
}

#[test]
fn construction_rejects_invalid_input() {
    let host = RecordingHost::new();
    assert!(matches!(
        Player::new(vec![], config("lifecycle-empty"), host.clone()),
        Err(PlayerError::EmptyPlaylist)
    ));
    assert!(matches!(
        Player::new(
            vec![image("dup", 3.0), video("dup")],
            config("lifecycle-dup"),
            host,
        ),
        Err(PlayerError::Validation { index: 1, .. })
    ));
    assert!(Player::instance("lifecycle-empty").is_none());
}

#[test]
fn image_without_duration_is_rejected() {
    let json = r#"[{ "id": "a", "type": "image", "imageUrl": "a.jpg" }]"#;
    let result = Player::from_json(json, config("lifecycle-no-duration"), RecordingHost::new());
    assert!(matches!(
        result,
        Err(PlayerError::Validation { index: 0, .. })
    ));
    assert!(Player::instance("lifecycle-no-duration").is_none());
}

#[test]
fn from_json_parses_camel_case_descriptors() {
    let json = r#"[
        { "id": "a", "type": "image", "imageUrl": "a.jpg", "duration": 2.5 },
        { "id": "b", "type": "video", "videoUrl": "b.mp4", "overlay": {"caption": "hi"} }
    ]"#;
    let player =
        Player::from_json(json, config("lifecycle-json"), RecordingHost::new()).unwrap();
    let items = player.items();
    assert_eq!(items[0].duration_secs, Some(2.5));
    assert_eq!(items[1].kind, MediaKind::Video);
    player.destroy();
}

#[tokio::test(start_paused = true)]
async fn start_is_idempotent() {
    let host = RecordingHost::new();
    let player = Player::new(
        vec![image("a", 10.0)],
        config("lifecycle-start"),
        host.clone(),
    )
    .unwrap();
    let events = player.subscribe();
    player.media_ready("a");

    player.start().await;
    player.start().await;

    assert_eq!(player.state(), PlayerState::Playing);
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(
        drain_tags(&events),
        vec!["item_start:a".to_string(), "start".to_string()]
    );
    assert!(host.log.contains("stage.show"));
    assert!(host.log.contains("stage.enter_fullscreen(false)"));
    assert!(host.log.contains("a.show"));

    player.destroy();
}

#[tokio::test(start_paused = true)]
async fn autostart_disabled_reveals_without_playing() {
    let host = RecordingHost::new();
    let player = Player::new(
        vec![image("a", 10.0)],
        PlayerConfig {
            autostart: false,
            ..config("lifecycle-autostart")
        },
        host.clone(),
    )
    .unwrap();
    let events = player.subscribe();
    player.media_ready("a");

    player.start().await;
    assert_eq!(player.state(), PlayerState::Playing);
    assert_eq!(
        player.current_item().unwrap().state,
        ItemState::Closed,
        "autostart off leaves the first item revealed but unstarted"
    );
    assert!(host.log.contains("a.show"));
    assert_eq!(drain_tags(&events), vec!["start".to_string()]);

    player.play_current_item();
    assert_eq!(player.current_item().unwrap().state, ItemState::Playing);
    assert_eq!(drain_tags(&events), vec!["item_start:a".to_string()]);

    player.destroy();
}

#[tokio::test(start_paused = true)]
async fn order_is_locked_while_open() {
    let player = Player::new(
        vec![image("a", 3.0), image("b", 3.0)],
        config("lifecycle-order"),
        RecordingHost::new(),
    )
    .unwrap();

    player
        .set_order(vec!["b".to_string(), "a".to_string()])
        .unwrap();
    assert_eq!(player.order(), vec!["b".to_string(), "a".to_string()]);

    player.media_ready("a");
    player.media_ready("b");
    player.start().await;
    assert_eq!(player.current_item().unwrap().id, "b");
    assert!(matches!(
        player.set_order(vec!["a".to_string()]),
        Err(PlayerError::OrderLocked(PlayerState::Playing))
    ));

    player.destroy();
}

#[tokio::test(start_paused = true)]
async fn mute_applies_to_playing_video_and_notifies() {
    let host = RecordingHost::with_video_duration(Duration::from_secs(8));
    let player = Player::new(vec![video("v")], config("lifecycle-mute"), host.clone()).unwrap();
    let events = player.subscribe();
    player.media_ready("v");

    player.start().await;
    assert!(host.log.contains("v.play"));
    drain(&events);

    player.set_muted(true);
    assert!(player.muted());
    assert!(host.log.contains("v.set_muted(true)"));
    assert_eq!(drain(&events), vec![PlayerEvent::Mute]);

    player.set_muted(false);
    assert_eq!(drain(&events), vec![PlayerEvent::Unmute]);

    player.destroy();
}

#[tokio::test(start_paused = true)]
async fn close_records_high_water_and_resets() {
    let host = RecordingHost::new();
    let player = Player::new(
        vec![image("hw", 10.0)],
        config("lifecycle-close"),
        host.clone(),
    )
    .unwrap();
    let events = player.subscribe();
    player.media_ready("hw");

    player.start().await;
    tokio::time::sleep(Duration::from_millis(2000)).await;
    let before = player.current_item().unwrap();
    assert!(
        (before.progress_percentage - 20.0).abs() < 1.0,
        "2s of a 10s image should sit near 20%, got {}",
        before.progress_percentage
    );

    player.close();
    assert_eq!(player.state(), PlayerState::Closed);
    assert_eq!(player.current_index(), None);
    assert_eq!(player.current_item(), None);
    assert!(host.log.contains("stage.hide"));
    assert!(host.log.contains("hw.hide"));

    // The cursor reset clears every progress bar.
    assert_eq!(player.items()[0].progress_percentage, 0.0);

    let tags = drain_tags(&events);
    assert_eq!(
        tags,
        vec![
            "item_start:hw".to_string(),
            "start".to_string(),
            "item_close:hw".to_string(),
            "close".to_string(),
        ]
    );
    let report = player.max_progress_map();
    let mark = report.get("hw").unwrap();
    assert!((mark.percentage - 20.0).abs() < 1.0);
    assert!((mark.value - mark.percentage / 10.0).abs() < 0.1);

    // Closing again is a no-op.
    player.close();
    assert!(drain(&events).is_empty());

    player.destroy();
}

#[tokio::test(start_paused = true)]
async fn overlays_follow_item_visibility() {
    let host = RecordingHost::new();
    let descriptor = storyplayer::ItemDescriptor::Image {
        id: "a".to_string(),
        image_url: "a.jpg".to_string(),
        duration: Some(10.0),
        overlay: Some(serde_json::json!({"caption": "hello"})),
    };
    let player = Player::new(vec![descriptor], config("lifecycle-overlay"), host.clone()).unwrap();
    player.media_ready("a");
    player.start().await;

    assert!(player.current_item().unwrap().has_overlay);
    assert!(host.log.contains("a.show_overlay"));

    // Closing just the item hides it without moving the cursor.
    player.close_current_item();
    assert!(host.log.contains("a.hide_overlay"));
    assert!(host.log.contains("a.hide"));
    assert_eq!(player.state(), PlayerState::Playing);
    assert_eq!(player.current_index(), Some(0));
    assert_eq!(player.current_item().unwrap().state, ItemState::Closed);

    // The item can be replayed in place.
    player.play_current_item();
    assert_eq!(player.current_item().unwrap().state, ItemState::Playing);

    player.destroy();
}

#[tokio::test(start_paused = true)]
async fn destroy_is_idempotent_and_unregisters() {
    let player = Player::new(
        vec![image("a", 10.0)],
        config("lifecycle-destroy"),
        RecordingHost::new(),
    )
    .unwrap();
    let events = player.subscribe();
    player.media_ready("a");
    player.start().await;

    player.destroy();
    player.destroy();

    assert_eq!(player.state(), PlayerState::Destroyed);
    assert!(Player::instance("lifecycle-destroy").is_none());
    let tags = drain_tags(&events);
    assert_eq!(tags.iter().filter(|tag| *tag == "close").count(), 1);

    // Every further operation is a guarded no-op.
    player.start().await;
    player.play_next_item();
    assert_eq!(player.state(), PlayerState::Destroyed);
    assert!(drain(&events).is_empty());
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_image_progress() {
    let player = Player::new(
        vec![image("a", 10.0)],
        config("lifecycle-pause"),
        RecordingHost::new(),
    )
    .unwrap();
    let events = player.subscribe();
    player.media_ready("a");
    player.start().await;

    tokio::time::sleep(Duration::from_millis(1000)).await;
    player.pause();
    assert_eq!(player.state(), PlayerState::Paused);
    assert_eq!(player.current_item().unwrap().state, ItemState::Paused);
    let frozen = player.current_item().unwrap().progress_percentage;

    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert_eq!(
        player.current_item().unwrap().progress_percentage,
        frozen,
        "no progress accrues while paused"
    );
    // Pausing twice does not double-notify.
    player.pause();

    player.resume();
    assert_eq!(player.state(), PlayerState::Playing);
    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert!(player.current_item().unwrap().progress_percentage > frozen);

    let tags = drain_tags(&events);
    assert_eq!(
        tags,
        vec![
            "item_start:a".to_string(),
            "start".to_string(),
            "item_pause".to_string(),
            "item_resume".to_string(),
        ]
    );

    player.destroy();
}

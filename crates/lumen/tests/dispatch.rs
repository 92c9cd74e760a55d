//! Dispatcher and runtime behaviour against the in-memory world.

use std::time::Duration;

use lumen::prelude::*;
use lumen::{DispatchStats, RetryReport};
use lumen_protocol::messages::{
    AttributeMsg, CloseDialogMsg, DialogInputMsg, LocationMsg, MusicMsg, PlayerIdMsg, TurnCharMsg,
};
use lumen_protocol::{CharacterId, Direction, Location};
use lumen_world::{CharacterAttribute, Dialog};
use tokio::sync::mpsc;

const PLAYER: CharacterId = CharacterId(1);

fn world_with_player() -> GameWorld {
    let mut world = GameWorld::new();
    world.player.set_id(PLAYER);
    world
}

fn dispatch(
    d: &mut Dispatcher,
    world: &mut GameWorld,
    tasks: &UpdateTaskManager<GameWorld>,
    reply: impl Into<ServerReply>,
) -> DispatchOutcome {
    let mut cx = ExecContext::new(world, tasks);
    d.dispatch(reply.into(), &mut cx)
}

fn retry(d: &mut Dispatcher, world: &mut GameWorld, tasks: &UpdateTaskManager<GameWorld>) -> RetryReport {
    let mut cx = ExecContext::new(world, tasks);
    d.retry_pending(&mut cx)
}

fn location(x: i16, y: i16) -> LocationMsg {
    LocationMsg {
        location: Location::new(x, y, 0),
    }
}

fn turn(character: CharacterId) -> TurnCharMsg {
    TurnCharMsg {
        location: Location::default(),
        direction: Direction::South,
        character,
    }
}

// =========================================================================
// Single dispatch
// =========================================================================

#[test]
fn test_turn_for_unknown_character_succeeds() {
    let mut d = Dispatcher::default();
    let mut world = world_with_player();
    let tasks = UpdateTaskManager::default();

    let outcome = dispatch(&mut d, &mut world, &tasks, turn(CharacterId(77)));
    assert_eq!(outcome, DispatchOutcome::Succeeded);
    assert_eq!(d.pending(), 0);
    assert!(world.characters.is_empty());
}

#[test]
fn test_attribute_for_unknown_character_fails() {
    let mut d = Dispatcher::default();
    let mut world = world_with_player();
    let tasks = UpdateTaskManager::default();

    let msg = AttributeMsg {
        character: CharacterId(42),
        attribute: "hitpoints".into(),
        value: 5000,
    };
    assert_eq!(dispatch(&mut d, &mut world, &tasks, msg), DispatchOutcome::Failed);
    assert_eq!(d.pending(), 0);
    assert_eq!(d.stats().failed, 1);
}

#[test]
fn test_unknown_attribute_name_fails() {
    let mut d = Dispatcher::default();
    let mut world = world_with_player();
    let tasks = UpdateTaskManager::default();

    let msg = AttributeMsg {
        character: PLAYER,
        attribute: "luck".into(),
        value: 1,
    };
    assert_eq!(dispatch(&mut d, &mut world, &tasks, msg), DispatchOutcome::Failed);
    assert!(world.player.attributes.is_empty());
}

#[test]
fn test_attribute_for_player_applies() {
    let mut d = Dispatcher::default();
    let mut world = world_with_player();
    let tasks = UpdateTaskManager::default();

    let msg = AttributeMsg {
        character: PLAYER,
        attribute: "mana".into(),
        value: 300,
    };
    assert_eq!(dispatch(&mut d, &mut world, &tasks, msg), DispatchOutcome::Succeeded);
    assert_eq!(world.player.attributes.get(CharacterAttribute::Mana), Some(300));
}

// =========================================================================
// Rescheduling
// =========================================================================

#[test]
fn test_rescheduled_reply_applies_once_identity_arrives() {
    let mut d = Dispatcher::default();
    let mut world = GameWorld::new();
    let tasks = UpdateTaskManager::default();

    assert_eq!(
        dispatch(&mut d, &mut world, &tasks, turn(PLAYER)),
        DispatchOutcome::Rescheduled
    );
    assert_eq!(d.pending(), 1);

    // Still not ready: stays queued, nothing applied.
    let report = retry(&mut d, &mut world, &tasks);
    assert_eq!(report.attempted, 1);
    assert_eq!(report.pending, 1);
    assert_eq!(world.player.movement().facing(), None);

    dispatch(&mut d, &mut world, &tasks, PlayerIdMsg { id: PLAYER });
    let report = retry(&mut d, &mut world, &tasks);
    assert_eq!(report.succeeded, 1);
    assert_eq!(report.pending, 0);
    assert_eq!(world.player.movement().facing(), Some(Direction::South));
    assert_eq!(world.player.movement().pending(), 1);
}

#[test]
fn test_queue_only_holds_rescheduled_replies() {
    let mut d = Dispatcher::default();
    let mut world = GameWorld::new();
    let tasks = UpdateTaskManager::default();

    dispatch(&mut d, &mut world, &tasks, location(1, 1));
    dispatch(&mut d, &mut world, &tasks, MusicMsg { song: 3 });
    dispatch(&mut d, &mut world, &tasks, turn(PLAYER));

    let names: Vec<_> = d.pending_names().collect();
    assert_eq!(names, ["Location", "TurnChar"]);
    assert_eq!(
        d.stats(),
        DispatchStats {
            succeeded: 1,
            rescheduled: 2,
            ..DispatchStats::default()
        }
    );
}

#[test]
fn test_retry_keeps_arrival_order() {
    let mut d = Dispatcher::default();
    let mut world = GameWorld::new();
    let tasks = UpdateTaskManager::default();

    dispatch(&mut d, &mut world, &tasks, location(1, 1));
    dispatch(&mut d, &mut world, &tasks, location(2, 2));
    world.player.set_id(PLAYER);

    let report = retry(&mut d, &mut world, &tasks);
    assert_eq!(report.succeeded, 2);
    assert_eq!(world.player.location(), Some(Location::new(2, 2, 0)));
}

#[test]
fn test_retry_gives_up_after_max_attempts() {
    let mut d = Dispatcher::new(RetryPolicy {
        max_attempts: 3,
        max_age: Duration::from_secs(60),
    });
    let mut world = GameWorld::new();
    let tasks = UpdateTaskManager::default();

    dispatch(&mut d, &mut world, &tasks, location(1, 1));
    assert_eq!(retry(&mut d, &mut world, &tasks).pending, 1);

    let report = retry(&mut d, &mut world, &tasks);
    assert_eq!(report.abandoned, 1);
    assert_eq!(report.pending, 0);
    assert_eq!(d.stats().abandoned, 1);
}

#[test]
fn test_single_attempt_policy_abandons_immediately() {
    let mut d = Dispatcher::new(RetryPolicy {
        max_attempts: 1,
        max_age: Duration::from_secs(60),
    });
    let mut world = GameWorld::new();
    let tasks = UpdateTaskManager::default();

    assert_eq!(
        dispatch(&mut d, &mut world, &tasks, location(1, 1)),
        DispatchOutcome::Abandoned
    );
    assert_eq!(d.pending(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_retry_gives_up_after_max_age() {
    let mut d = Dispatcher::new(RetryPolicy {
        max_attempts: 1000,
        max_age: Duration::from_secs(1),
    });
    let mut world = GameWorld::new();
    let tasks = UpdateTaskManager::default();

    dispatch(&mut d, &mut world, &tasks, location(1, 1));

    tokio::time::advance(Duration::from_millis(500)).await;
    assert_eq!(retry(&mut d, &mut world, &tasks).pending, 1);

    tokio::time::advance(Duration::from_millis(600)).await;
    let report = retry(&mut d, &mut world, &tasks);
    assert_eq!(report.abandoned, 1);
    assert_eq!(d.pending(), 0);
}

// =========================================================================
// Disconnect
// =========================================================================

#[test]
fn test_disconnect_rejects_and_discards() {
    let mut d = Dispatcher::default();
    let mut world = GameWorld::new();
    let tasks = UpdateTaskManager::default();

    dispatch(&mut d, &mut world, &tasks, location(1, 1));
    d.on_disconnect();
    assert_eq!(d.pending(), 0);
    assert!(!d.is_accepting());

    assert_eq!(
        dispatch(&mut d, &mut world, &tasks, MusicMsg { song: 1 }),
        DispatchOutcome::Rejected
    );
    assert_eq!(world.environment.music(), 0);
    assert_eq!(retry(&mut d, &mut world, &tasks), RetryReport::default());
    assert_eq!(d.stats().rejected, 1);

    d.reset();
    assert_eq!(
        dispatch(&mut d, &mut world, &tasks, MusicMsg { song: 1 }),
        DispatchOutcome::Succeeded
    );
}

// =========================================================================
// Runtime frames
// =========================================================================

fn runtime(world: GameWorld) -> (ClientRuntime<GameWorld>, mpsc::Sender<Inbound>) {
    let (tx, rx) = mpsc::channel(64);
    (ClientRuntime::new(&ClientConfig::default(), world, rx), tx)
}

async fn send(tx: &mpsc::Sender<Inbound>, reply: impl Into<ServerReply>) {
    tx.send(Inbound::Reply(reply.into())).await.unwrap();
}

#[tokio::test]
async fn test_frame_retries_before_dispatching_new_replies() {
    let (mut rt, tx) = runtime(GameWorld::new());

    send(&tx, location(1, 1)).await;
    let report = rt.frame(Duration::ZERO);
    assert_eq!(report.dispatched, 1);
    assert_eq!(rt.dispatcher().pending(), 1);

    rt.world_mut().player.set_id(PLAYER);
    send(&tx, location(2, 2)).await;
    let report = rt.frame(Duration::ZERO);
    assert_eq!(report.retry.succeeded, 1);
    assert_eq!(report.dispatched, 1);
    assert_eq!(rt.world().player.location(), Some(Location::new(2, 2, 0)));
}

#[tokio::test]
async fn test_dialog_input_opens_on_the_next_drain() {
    let mut world = GameWorld::new();
    world.interface.set_ready(true);
    let (mut rt, tx) = runtime(world);

    send(
        &tx,
        DialogInputMsg {
            dialog: 7,
            title: "Name".into(),
            description: "Enter a name".into(),
            max_chars: 16,
            multiline: false,
        },
    )
    .await;

    let report = rt.frame(Duration::from_millis(16));
    assert_eq!(report.tasks.executed, 1);
    assert!(matches!(
        rt.world().interface.dialog(7),
        Some(Dialog::Input { max_chars: 16, .. })
    ));
}

#[tokio::test]
async fn test_gui_replies_wait_for_the_gui() {
    let (mut rt, tx) = runtime(GameWorld::new());

    send(
        &tx,
        lumen_protocol::messages::InformMsg {
            kind: lumen_protocol::InformKind::Server,
            text: "welcome".into(),
        },
    )
    .await;
    rt.frame(Duration::ZERO);
    assert_eq!(rt.dispatcher().pending(), 1);
    assert_eq!(rt.world().interface.informs().count(), 0);

    rt.world_mut().interface.set_ready(true);
    let report = rt.frame(Duration::ZERO);
    assert_eq!(report.retry.succeeded, 1);
    assert_eq!(report.tasks.executed, 1);
    assert_eq!(rt.world().interface.informs().count(), 1);
}

#[tokio::test]
async fn test_disconnect_discards_retries_but_keeps_update_tasks() {
    let (mut rt, tx) = runtime(GameWorld::new());

    send(&tx, location(1, 1)).await;
    rt.frame(Duration::ZERO);
    rt.tasks().add_task_for_later(|cx| cx.state().environment.set_music(9));

    tx.send(Inbound::Disconnected {
        reason: "connection reset".into(),
    })
    .await
    .unwrap();
    let report = rt.frame(Duration::ZERO);

    assert!(report.disconnected);
    assert_eq!(report.tasks.executed, 1);
    assert_eq!(rt.dispatcher().pending(), 0);
    assert_eq!(rt.world().environment.music(), 9);
    assert_eq!(rt.world().player.location(), None);
    assert_eq!(rt.disconnect_reason(), Some("connection reset"));

    // Later frames stay quiet.
    send(&tx, MusicMsg { song: 2 }).await;
    assert_eq!(rt.frame(Duration::ZERO).dispatched, 0);
    assert_eq!(rt.world().environment.music(), 9);
}

#[tokio::test]
async fn test_close_then_reopen_dialog_keeps_wire_order() {
    let mut world = GameWorld::new();
    world.interface.set_ready(true);
    let (mut rt, tx) = runtime(world);

    send(&tx, CloseDialogMsg { dialog: 7 }).await;
    send(
        &tx,
        DialogInputMsg {
            dialog: 7,
            title: "Rename".into(),
            description: "New name".into(),
            max_chars: 20,
            multiline: false,
        },
    )
    .await;

    let report = rt.frame(Duration::from_millis(16));
    assert_eq!(report.tasks.executed, 2);
    assert!(matches!(
        rt.world().interface.dialog(7),
        Some(Dialog::Input { max_chars: 20, .. })
    ));
}

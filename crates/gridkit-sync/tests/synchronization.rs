//! End-to-end synchronization tests: optimistic clients submitting through
//! the revision log and converging on the server's serialized state.

use gridkit::{Column, Grid, Operation, Row, RowCell};
use gridkit_sync::{ClientReconciler, GridSession, ReceiveError, SessionRegistry};

fn seeded_grid() -> Grid<String> {
    Grid::with(
        vec![Column {
            id: "c1".to_string(),
            name: "title".to_string(),
            col_type: "text".to_string(),
        }],
        vec![Row {
            id: "r1".to_string(),
            cells: vec![RowCell {
                col_id: "c1".to_string(),
                value: "initial".to_string(),
            }],
        }],
    )
}

fn update(row: &str, col: &str, value: &str) -> Operation<String> {
    Operation::update_cell(row.to_string(), col.to_string(), value)
}

/// The update-vs-delete race: A updates a cell while B concurrently deletes
/// the row, both against revision 0. The server serializes A first; B's
/// delete still wins and every replica ends with the row absent.
#[test]
fn concurrent_update_and_delete_converge_on_deletion() {
    let mut server = GridSession::new(seeded_grid());
    let mut alice = ClientReconciler::new(seeded_grid(), 0);
    let mut bob = ClientReconciler::new(seeded_grid(), 0);

    let (alice_base, alice_op) = alice.edit(update("r1", "c1", "A")).unwrap();
    let (bob_base, bob_op) = bob
        .edit(Operation::delete_row("r1".to_string()))
        .unwrap();
    assert_eq!((alice_base, bob_base), (0, 0));

    let first = server.receive(alice_base, alice_op).unwrap();
    assert_eq!(first.revision, 1);
    assert_eq!(server.grid().cell(&"r1".to_string(), &"c1".to_string()), Some("A"));

    let second = server.receive(bob_base, bob_op).unwrap();
    assert_eq!(second.revision, 2);
    assert_eq!(second.operation, Operation::delete_row("r1".to_string()));
    assert!(!server.grid().has_row(&"r1".to_string()));

    // Broadcast both entries: each client acknowledges its own, applies the
    // other's.
    alice.acknowledge(&first);
    alice.apply_remote(&second);

    bob.apply_remote(&first);
    bob.acknowledge(&second);

    assert_eq!(alice.grid(), server.grid());
    assert_eq!(bob.grid(), server.grid());
    assert!(!alice.grid().has_row(&"r1".to_string()));
}

#[test]
fn same_cell_race_resolves_to_one_value_everywhere() {
    let mut server = GridSession::new(seeded_grid());
    let mut alice = ClientReconciler::new(seeded_grid(), 0);
    let mut bob = ClientReconciler::new(seeded_grid(), 0);

    let (_, alice_op) = alice.edit(update("r1", "c1", "alice")).unwrap();
    let (_, bob_op) = bob.edit(update("r1", "c1", "bob")).unwrap();

    let first = server.receive(0, alice_op).unwrap();
    // Bob's stale submission keeps its own value: transformed with local
    // priority over the history it missed, it overwrites at revision 2.
    let second = server.receive(0, bob_op).unwrap();

    alice.acknowledge(&first);
    alice.apply_remote(&second);
    bob.apply_remote(&first);
    bob.acknowledge(&second);

    let winner = server
        .grid()
        .cell(&"r1".to_string(), &"c1".to_string())
        .unwrap()
        .to_string();
    assert_eq!(
        alice.grid().cell(&"r1".to_string(), &"c1".to_string()),
        Some(winner.as_str())
    );
    assert_eq!(
        bob.grid().cell(&"r1".to_string(), &"c1".to_string()),
        Some(winner.as_str())
    );
}

#[test]
fn three_clients_converge_through_interleaved_broadcasts() {
    let mut server = GridSession::new(seeded_grid());
    let mut clients: Vec<ClientReconciler<String>> =
        (0..3).map(|_| ClientReconciler::new(seeded_grid(), 0)).collect();

    // (submitting client, operation) in server arrival order; all edits are
    // made optimistically before anything is broadcast.
    let edits = [
        (0usize, update("r1", "c1", "zero")),
        (1, Operation::delete_row("r1".to_string())),
        (2, update("r1", "c1", "two")),
        (0, Operation::insert_row(gridkit::InsertRow {
            id: "r2".to_string(),
            data: vec![RowCell {
                col_id: "c1".to_string(),
                value: "fresh".to_string(),
            }],
        })),
    ];

    let mut submissions = Vec::new();
    for (who, op) in &edits {
        let (base, op) = clients[*who].edit(op.clone()).unwrap();
        submissions.push((*who, base, op));
    }

    let mut entries = Vec::new();
    for (who, base, op) in submissions {
        entries.push((who, server.receive(base, op).unwrap()));
    }

    for (origin, entry) in &entries {
        for (index, client) in clients.iter_mut().enumerate() {
            if index == *origin {
                client.acknowledge(entry);
            } else {
                client.apply_remote(entry);
            }
        }
    }

    for client in &clients {
        assert!(!client.has_pending());
        assert_eq!(client.revision(), server.revision());
        assert_eq!(client.grid(), server.grid());
    }
    assert!(!server.grid().has_row(&"r1".to_string()));
    assert_eq!(
        server.grid().cell(&"r2".to_string(), &"c1".to_string()),
        Some("fresh")
    );
}

#[test]
fn reconnecting_client_catches_up_from_history() {
    let mut server = GridSession::new(seeded_grid());
    let mut client = ClientReconciler::new(seeded_grid(), 0);

    server.receive(0, update("r1", "c1", "a")).unwrap();
    server.receive(1, update("r1", "c1", "b")).unwrap();
    server.receive(2, update("r1", "c1", "c")).unwrap();

    client.resync(server.history(client.revision()));
    assert_eq!(client.revision(), 3);
    assert_eq!(client.grid(), server.grid());

    // Restartable: resyncing from the same point again finds nothing new.
    client.resync(server.history(client.revision()));
    assert_eq!(client.revision(), 3);
}

#[test]
fn snapshot_fallback_replaces_local_state() {
    let mut server = GridSession::new(seeded_grid());
    server.receive(0, update("r1", "c1", "server-side")).unwrap();

    let mut client = ClientReconciler::new(seeded_grid(), 0);
    client.edit(update("r1", "c1", "doomed local")).unwrap();

    client.reset(server.snapshot());
    assert!(!client.has_pending());
    assert_eq!(client.revision(), 1);
    assert_eq!(client.grid(), server.grid());
}

#[test]
fn stale_submission_is_rejected_then_accepted_after_resync() {
    let mut server = GridSession::new(seeded_grid());
    let mut client = ClientReconciler::new(seeded_grid(), 0);

    // Client somehow claims a future revision (corrupt state): rejected.
    let err = server.receive(5, update("r1", "c1", "x")).unwrap_err();
    assert!(matches!(err, ReceiveError::StaleRevision { .. }));

    // After a snapshot resync the client submits against a real revision.
    server.receive(0, update("r1", "c1", "a")).unwrap();
    client.reset(server.snapshot());
    let (base, op) = client.edit(update("r1", "c1", "b")).unwrap();
    let entry = server.receive(base, op).unwrap();
    assert_eq!(entry.revision, 2);
}

#[test]
fn registry_serves_grids_independently() {
    let registry = SessionRegistry::<String>::new();
    registry
        .session_or("north", seeded_grid)
        .lock()
        .unwrap()
        .receive(0, update("r1", "c1", "north"))
        .unwrap();

    registry
        .session_or("south", seeded_grid)
        .lock()
        .unwrap()
        .receive(0, Operation::delete_row("r1".to_string()))
        .unwrap();

    let north = registry.session("north");
    let south = registry.session("south");
    assert_eq!(
        north.lock().unwrap().grid().cell(&"r1".to_string(), &"c1".to_string()),
        Some("north")
    );
    assert!(!south.lock().unwrap().grid().has_row(&"r1".to_string()));
}

#[test]
fn pagination_reflects_accepted_inserts() {
    let mut server = GridSession::new(seeded_grid());
    for i in 0..14 {
        let base = server.revision();
        server
            .receive(
                base,
                Operation::insert_row(gridkit::InsertRow {
                    id: format!("new-{i}"),
                    data: vec![],
                }),
            )
            .unwrap();
    }

    let page = server.page(2, 10);
    assert_eq!(page.total, 15);
    assert_eq!(page.rows.len(), 5);
    assert_eq!(page.revision, 14);
}

/// The JSON wire shape: camelCase keys, absent change-set ≡ empty.
#[test]
fn operation_wire_shape_round_trips() {
    let op = Operation {
        update_cells: Some(vec![gridkit::UpdateCell {
            col_id: "c1".to_string(),
            row_id: "r1".to_string(),
            value: "v".to_string(),
        }]),
        delete_rows: Some(vec!["r2".to_string()]),
        ..Operation::default()
    };

    let json = serde_json::to_value(&op).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "updateCells": [{ "colId": "c1", "rowId": "r1", "value": "v" }],
            "deleteRows": ["r2"],
        })
    );

    let back: Operation<String> = serde_json::from_value(json).unwrap();
    assert_eq!(back, op);

    // An empty object is the identity operation.
    let empty: Operation<String> = serde_json::from_str("{}").unwrap();
    assert!(empty.is_identity());
}

#[test]
fn insert_col_wire_shape_uses_type_key() {
    let op = Operation::insert_col(gridkit::InsertCol {
        id: "c9".to_string(),
        index: 2,
        col_name: "status".to_string(),
        col_type: "text".to_string(),
    });

    let json = serde_json::to_value(&op).unwrap();
    assert_eq!(
        json["insertCols"][0],
        serde_json::json!({ "id": "c9", "index": 2, "colName": "status", "type": "text" })
    );
}

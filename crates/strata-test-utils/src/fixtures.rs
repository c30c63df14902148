//! Shared scene types.
//!
//! - `Widget`: counter with a self-typed `target` reference, a `clicked`
//!   signal and a `poke` slot.
//! - `Ticker`: accumulates elapsed time on every update.
//! - `Spawner`: enrolls its `buddy` Ticker from inside its own update.
//! - `Beacon`: sets `armed` when initialized after a load.
//! - `Shape`: abstract.
//! - `Actor`: composite of `Body` with `Health` and `Sensor` aspects;
//!   `Sensor.vitals` references a `Health`.

use std::sync::Arc;

use strata_core::TypeId;
use strata_object::{ObjectTypeBuilder, TypeRegistry};
use strata_tree::Scalar;

pub struct SceneTypes {
    pub registry: Arc<TypeRegistry>,
    pub widget: TypeId,
    pub ticker: TypeId,
    pub spawner: TypeId,
    pub beacon: TypeId,
    pub shape: TypeId,
    pub body: TypeId,
    pub health: TypeId,
    pub sensor: TypeId,
    pub actor: TypeId,
}

fn first_integer(args: &[Scalar]) -> i64 {
    match args.first() {
        Some(Scalar::Integer(n)) => *n,
        Some(Scalar::Float(f)) => *f as i64,
        _ => 1,
    }
}

/// Register every fixture type in a fresh registry.
pub fn scene_types() -> SceneTypes {
    let mut types = TypeRegistry::new();

    let widget = types
        .register(
            ObjectTypeBuilder::new("Widget")
                .integer("count")
                .string("label")
                .reference("target", "Widget")
                .signal("clicked")
                .slot("poke", |obj, args| {
                    let count = obj.integer("count").unwrap_or(0);
                    obj.set_integer("count", count + first_integer(args));
                }),
        )
        .expect("Widget registers");

    let ticker = types
        .register(
            ObjectTypeBuilder::new("Ticker")
                .float("elapsed")
                .integer("ticks")
                .on_update(|cx, delta| {
                    let elapsed = cx.float("elapsed").unwrap_or(0.0);
                    let ticks = cx.integer("ticks").unwrap_or(0);
                    cx.set_float("elapsed", elapsed + delta);
                    cx.set_integer("ticks", ticks + 1);
                }),
        )
        .expect("Ticker registers");

    let spawner = types
        .register(
            ObjectTypeBuilder::new("Spawner")
                .reference("buddy", "Ticker")
                .on_update(|cx, _| {
                    if let Some(buddy) = cx.reference("buddy") {
                        cx.enroll(buddy);
                    }
                }),
        )
        .expect("Spawner registers");

    let beacon = types
        .register(
            ObjectTypeBuilder::new("Beacon")
                .integer("armed")
                .on_initialize(|obj| {
                    obj.set_integer("armed", 1);
                }),
        )
        .expect("Beacon registers");

    let shape = types
        .register(ObjectTypeBuilder::new("Shape").abstract_type().float("area"))
        .expect("Shape registers");

    let body = types
        .register(ObjectTypeBuilder::new("Body").string("name"))
        .expect("Body registers");

    let health = types
        .register(
            ObjectTypeBuilder::new("Health")
                .integer("hp")
                .slot("heal", |obj, args| {
                    let hp = obj.integer("hp").unwrap_or(0);
                    obj.set_integer("hp", hp + first_integer(args));
                }),
        )
        .expect("Health registers");

    let sensor = types
        .register(
            ObjectTypeBuilder::new("Sensor")
                .float("range")
                .reference("vitals", "Health"),
        )
        .expect("Sensor registers");

    let mut actor = types.new_composite("Actor", Some(body)).expect("Actor base");
    actor
        .add_aspect(Arc::clone(types.get(health).expect("Health")))
        .expect("Health aspect");
    actor
        .add_aspect(Arc::clone(types.get(sensor).expect("Sensor")))
        .expect("Sensor aspect");
    let actor = types.register_composite(actor).expect("Actor registers");

    SceneTypes {
        registry: Arc::new(types),
        widget,
        ticker,
        spawner,
        beacon,
        shape,
        body,
        health,
        sensor,
        actor,
    }
}

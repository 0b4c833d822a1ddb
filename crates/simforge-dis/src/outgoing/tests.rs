// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use super::*;
use crate::params;
use crate::pdu::PduType;
use crate::types::{DamageState, EntityId, EntityType, ForceId};
use simforge_core::math::{DVec3, Vec3};
use simforge_core::UniqueId;
use simforge_data::{ActorTypeKey, NamedParameter, PropertyValue};

// --- FIXTURES ---

fn vehicle() -> ActorTypeKey {
    ActorTypeKey::new("dis", "Vehicle")
}

fn state() -> SharedState {
    let mut state = SharedState::default();
    state
        .mapping_mut()
        .add(EntityType::new(1, 1, 225, 1, 0, 0, 0), vehicle());
    state
}

fn dispatcher() -> OutgoingMessage {
    let mut outgoing = OutgoingMessage::new();
    outgoing.add_adapter(MessageKind::ActorCreated, Box::new(ActorUpdateToEntityState));
    outgoing.add_adapter(MessageKind::ActorUpdated, Box::new(ActorUpdateToEntityState));
    outgoing.add_adapter(
        MessageKind::ActorDeleted,
        Box::new(ActorDeletedToRemoveEntity::default()),
    );
    outgoing
}

fn update(actor: UniqueId) -> Message {
    let mut message = Message::new(MessageKind::ActorUpdated, actor)
        .with_actor_type(vehicle())
        .with_value(params::TRANSLATION, DVec3::new(10.0, 20.0, 30.0))
        .with_value(params::VELOCITY, Vec3::new(1.0, 0.0, 0.0))
        .with_value(params::MARKING, "LEOPARD 2A6 TANK".to_owned());
    message.push_parameter(NamedParameter::new(
        params::FORCE,
        PropertyValue::Enumeration("FRIENDLY".to_owned()),
    ));
    message.push_parameter(NamedParameter::new(
        params::DAMAGE_STATE,
        PropertyValue::Enumeration("Destroyed".to_owned()),
    ));
    message
}

// --- TESTS ---

#[test]
fn test_local_actor_gets_an_entity_id() {
    let outgoing = dispatcher();
    let mut state = state();
    let actor = UniqueId::new();

    assert!(outgoing.handle(&update(actor), &mut state).is_forwarded());
    assert!(outgoing.handle(&update(actor), &mut state).is_forwarded());

    let pdus = outgoing.drain();
    assert_eq!(pdus.len(), 2);
    let Pdu::EntityState(first) = &pdus[0] else {
        panic!("expected an entity state PDU, got {:?}", pdus[0]);
    };
    assert_eq!(first.entity_id, EntityId::new(1, 1, 1));
    assert_eq!(pdus[1].subject(), first.entity_id);
    assert_eq!(first.entity_type, EntityType::new(1, 1, 225, 1, 0, 0, 0));
    assert_eq!(first.location, DVec3::new(10.0, 20.0, 30.0));
    assert_eq!(first.linear_velocity, Vec3::new(1.0, 0.0, 0.0));
    assert_eq!(first.orientation, Vec3::ZERO);
    assert_eq!(first.force_id, ForceId::Friendly);
    assert_eq!(DamageState::from_appearance(first.appearance), DamageState::Destroyed);
    assert_eq!(first.marking, "LEOPARD 2A6");
    assert_eq!(state.entities().entity_for(&actor), Some(first.entity_id));
}

#[test]
fn test_unmapped_actor_type_is_dropped() {
    let outgoing = dispatcher();
    let mut state = state();
    let message = Message::new(MessageKind::ActorUpdated, UniqueId::new())
        .with_actor_type(ActorTypeKey::new("dis", "Waypoint"));
    assert!(matches!(
        outgoing.handle(&message, &mut state),
        Disposition::Dropped(DisError::UnmappedActorType(_))
    ));

    let untyped = Message::new(MessageKind::ActorUpdated, UniqueId::new());
    assert!(matches!(
        outgoing.handle(&untyped, &mut state),
        Disposition::Dropped(DisError::MissingActorType(_))
    ));
    assert!(outgoing.drain().is_empty());
    assert!(state.entities().is_empty());
}

#[test]
fn test_wrongly_typed_parameter_is_dropped() {
    let outgoing = dispatcher();
    let mut state = state();
    let actor = UniqueId::new();
    let message = update(actor).with_value(params::VELOCITY, 4.0f32);
    assert!(matches!(
        outgoing.handle(&message, &mut state),
        Disposition::Dropped(DisError::Message(_))
    ));
    // Nothing was announced, so nothing is mapped and nothing can be removed.
    assert!(state.entities().is_empty());
    assert!(state.entities().entity_for(&actor).is_none());
    assert!(matches!(
        outgoing.handle(&Message::new(MessageKind::ActorDeleted, actor), &mut state),
        Disposition::Dropped(DisError::UnmappedActor(_))
    ));
    assert!(outgoing.drain().is_empty());

    // A valid message afterwards gets the first entity number.
    assert!(outgoing.handle(&update(actor), &mut state).is_forwarded());
    assert_eq!(state.entities().entity_for(&actor), Some(EntityId::new(1, 1, 1)));
}

#[test]
fn test_single_precision_translation_is_widened() {
    let outgoing = dispatcher();
    let mut state = state();
    let message = update(UniqueId::new()).with_value(params::TRANSLATION, Vec3::new(1.0, 2.0, 3.0));
    outgoing.handle(&message, &mut state);
    let Some(Pdu::EntityState(pdu)) = outgoing.drain().pop() else {
        panic!("expected an entity state PDU");
    };
    assert_eq!(pdu.location, DVec3::new(1.0, 2.0, 3.0));
}

#[test]
fn test_remote_actors_are_not_echoed() {
    let outgoing = dispatcher();
    let mut state = state();
    let message = update(UniqueId::new()).with_source(params::SOURCE);
    assert!(matches!(
        outgoing.handle(&message, &mut state),
        Disposition::Unhandled
    ));
}

#[test]
fn test_delete_known_actor() {
    let outgoing = dispatcher();
    let mut state = state();
    let actor = UniqueId::new();
    outgoing.handle(&update(actor), &mut state);
    let entity = state.entities().entity_for(&actor).unwrap();
    outgoing.drain();

    let delete = Message::new(MessageKind::ActorDeleted, actor);
    assert!(outgoing.handle(&delete, &mut state).is_forwarded());
    let pdus = outgoing.drain();
    assert_eq!(pdus.len(), 1);
    assert_eq!(pdus[0].pdu_type(), PduType::RemoveEntity);
    assert_eq!(pdus[0].subject(), entity);
    assert!(state.entities().entity_for(&actor).is_none());

    assert!(matches!(
        outgoing.handle(&delete, &mut state),
        Disposition::Dropped(DisError::UnmappedActor(id)) if id == actor
    ));
}

#[test]
fn test_create_entity_adapter() {
    let mut outgoing = OutgoingMessage::new();
    outgoing.add_adapter(
        MessageKind::ActorCreated,
        Box::new(ActorCreatedToCreateEntity::default()),
    );
    let mut state = state();
    let actor = UniqueId::new();
    let created = Message::new(MessageKind::ActorCreated, actor).with_actor_type(vehicle());

    assert!(outgoing.handle(&created, &mut state).is_forwarded());
    assert!(outgoing.handle(&created, &mut state).is_forwarded());
    let pdus = outgoing.drain();
    let requests: Vec<u32> = pdus
        .iter()
        .map(|pdu| match pdu {
            Pdu::CreateEntity(p) => {
                assert_eq!(p.receiving_id, EntityId::new(1, 1, 1));
                assert_eq!(p.originating_id, EntityId::new(1, 1, 0));
                p.request_id
            }
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(requests, vec![0, 1]);

    assert!(matches!(
        outgoing.handle(&Message::new(MessageKind::ActorUpdated, actor), &mut state),
        Disposition::Unhandled
    ));
}

//! End-to-end integration tests for the mapper
//!
//! These tests exercise the public API over realistic entity and DTO graphs.


use modelmap_core::{
    mappable, CollectionKind, Directive, Mapper, MappingError, StringToDateAdapter, MAPPING_FAILED,
};
use pretty_assertions::assert_eq;
use std::collections::{BTreeSet, HashSet, LinkedList, VecDeque};
use std::error::Error as _;
use test_support::*;
use uuid::Uuid;

#[test]
fn test_nested_person_maps_to_dto() {
    init_tracing();
    let person = sample_person();

    let dto: PersonDto = modelmap_core::map(&person).expect("mapping should succeed");

    assert_eq!(dto.name, "test-name");
    assert_eq!(dto.age, 1);
    assert_eq!(dto.sex, "test-sex");
    assert_eq!(dto.addresses.len(), 2);
    assert_eq!(dto.addresses[0].street_name, "test-street-1");
    assert_eq!(
        dto.addresses[0].extra_info,
        Some(ExtraInfoDto {
            coordinates: "11000011.000111".to_string(),
        })
    );
    assert_eq!(dto.addresses[1].zip_code, "test-zipcode-2");
    assert_eq!(dto.attributes.get("key").map(String::as_str), Some("value"));
}

#[test]
fn test_same_field_with_different_type_fails() {
    init_tracing();
    let err = modelmap_core::map::<ExtraDto>(&Extra { value: 1 }).unwrap_err();

    assert_eq!(err.to_string(), MAPPING_FAILED);
    assert!(err.cause().is_type_mismatch());
    let source = err.source().expect("cause should be chained");
    assert!(source.to_string().contains("`value`"));
    assert_eq!(err.path().to_string(), "value");
}

#[test]
fn test_string_to_uuid_adapter() {
    init_tracing();
    let request = Request {
        requester_id: REQUESTER_ID.to_string(),
    };

    let dto: RequestDto = Mapper::new().map(&request).unwrap();

    assert_eq!(dto.requester_id, Uuid::parse_str(REQUESTER_ID).unwrap());
}

#[test]
fn test_invalid_uuid_surfaces_adapter_error() {
    init_tracing();
    let request = Request {
        requester_id: "not-a-uuid".to_string(),
    };

    let err = Mapper::new().map::<RequestDto>(&request).unwrap_err();

    match err.cause() {
        MappingError::Adapter { field, source, .. } => {
            assert_eq!(field, "requester_id");
            assert!(source.to_string().contains("not-a-uuid"));
        }
        other => panic!("unexpected cause: {other}"),
    }
}

#[test]
fn test_error_path_points_into_collection() {
    init_tracing();

    mappable! {
        #[derive(Debug, Clone, Default)]
        struct Meeting {
            dates: Vec<String>,
        }
    }

    mappable! {
        #[derive(Debug, Clone, Default)]
        struct MeetingDto {
            dates: Vec<chrono::NaiveDate> => [Directive::transform::<StringToDateAdapter>()],
        }
    }

    let meeting = Meeting {
        dates: vec!["2024-05-01".to_string(), "May 2nd".to_string()],
    };
    let err = Mapper::new().map::<MeetingDto>(&meeting).unwrap_err();
    assert_eq!(err.path().to_string(), "dates[1]");

    let valid = Meeting {
        dates: vec!["2024-05-01".to_string()],
    };
    let dto: MeetingDto = Mapper::new().map(&valid).unwrap();
    assert_eq!(dto.dates.len(), 1);
}

mappable! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct Shelf {
        list: Vec<Address>,
        deque: Vec<Address>,
        linked: Vec<Address>,
        tags: Vec<String>,
        ordered: Vec<String>,
    }
}

mappable! {
    #[derive(Debug, Clone, Default, PartialEq)]
    struct ShelfDto {
        list: Vec<AddressDto>,
        deque: VecDeque<AddressDto>,
        linked: LinkedList<AddressDto>,
        tags: HashSet<String>,
        ordered: BTreeSet<String>,
    }
}

#[test]
fn test_every_standard_collection_kind() {
    init_tracing();
    let addresses = sample_person().addresses;
    let shelf = Shelf {
        list: addresses.clone(),
        deque: addresses.clone(),
        linked: addresses,
        tags: vec!["x".to_string(), "y".to_string(), "x".to_string()],
        ordered: vec!["c".to_string(), "a".to_string(), "b".to_string()],
    };

    let dto: ShelfDto = Mapper::new().map(&shelf).unwrap();

    let streets = |items: Vec<&AddressDto>| -> Vec<String> {
        items.into_iter().map(|a| a.street_name.clone()).collect()
    };
    let expected = vec!["test-street-1".to_string(), "test-street-2".to_string()];
    assert_eq!(streets(dto.list.iter().collect()), expected);
    assert_eq!(streets(dto.deque.iter().collect()), expected);
    assert_eq!(streets(dto.linked.iter().collect()), expected);
    assert_eq!(dto.tags.len(), 2);
    assert_eq!(
        dto.ordered.into_iter().collect::<Vec<_>>(),
        vec!["a".to_string(), "b".to_string(), "c".to_string()]
    );
}

#[test]
fn test_custom_collection_kind_requires_registration() {
    init_tracing();
    let recent = Recent {
        entries: vec!["first".to_string(), "second".to_string()],
    };

    let err = Mapper::new().map::<RecentRing>(&recent).unwrap_err();
    assert!(matches!(
        err.cause(),
        MappingError::UnsupportedCollectionKind { kind: CollectionKind::Custom(name), .. } if name == "ring"
    ));

    let mapper = Mapper::builder()
        .collection_kind(CollectionKind::Custom("ring".to_string()))
        .build()
        .unwrap();
    let dto: RecentRing = mapper.map(&recent).unwrap();
    assert_eq!(dto.entries.items, recent.entries);

    let back: Recent = mapper.map(&dto).unwrap();
    assert_eq!(back, recent);
}

#[test]
fn test_depth_guard_stops_runaway_recursion() {
    init_tracing();
    let mapper = Mapper::builder().max_depth(8).build().unwrap();

    let copy: Node = mapper.map(&node_chain(8)).unwrap();
    assert_eq!(copy, node_chain(8));

    let err = mapper.map::<Node>(&node_chain(9)).unwrap_err();
    assert!(matches!(err.cause(), MappingError::DepthExceeded { limit: 8 }));
    assert_eq!(err.path().segments().len(), 16);
}

#[test]
fn test_mapper_loaded_from_json_config() {
    init_tracing();
    let config = modelmap_core::MapperConfig::from_json(
        r#"{"max_depth": 4, "collection_kinds": ["list"]}"#,
    )
    .unwrap();
    let mapper = Mapper::with_config(config).unwrap();

    let dto: PersonDto = mapper.map(&sample_person()).unwrap();
    assert_eq!(dto.addresses.len(), 2);

    let err = mapper.map::<Node>(&node_chain(5)).unwrap_err();
    assert!(matches!(err.cause(), MappingError::DepthExceeded { limit: 4 }));
}

#[test]
fn test_concurrent_mapping_with_shared_mapper() {
    init_tracing();
    let mapper = Mapper::new();
    let person = sample_person();

    let results: Vec<PersonDto> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| mapper.map::<PersonDto>(&person)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("mapping thread panicked").unwrap())
            .collect()
    });

    assert_eq!(results.len(), 4);
    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
}

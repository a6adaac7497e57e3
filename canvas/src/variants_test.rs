#![allow(clippy::float_cmp)]

use super::*;
use crate::memory::MemoryEngine;

fn canvas() -> Canvas<MemoryEngine> {
    Canvas::new(MemoryEngine::new())
}

#[test]
fn handles_match_variants() {
    assert_eq!(Variant::Item.handle(), "item");
    assert_eq!(Variant::Custom { markup: String::new() }.handle(), "custom");
    assert_eq!(Variant::Image { src: String::new() }.handle(), "image");
    assert_eq!(Variant::ExclusiveChoice.handle(), "exclusivechoice");
    assert_eq!(Variant::Mail.handle(), "mail");
    assert_eq!(Variant::Db.handle(), "db");
}

#[test]
fn exclusive_choice_has_one_input_two_outputs() {
    let mut c = canvas();
    let id = c.add_exclusive_choice();
    let item = c.item(id.as_str()).expect("item");
    assert_eq!(item.handle(), HANDLE_EXCLUSIVE_CHOICE);
    assert_eq!(item.inputs().len(), 1);
    assert_eq!(item.inputs()[0].anchor, Anchor::LeftMiddle);
    let outputs: Vec<Anchor> = item.outputs().iter().map(|e| e.anchor).collect();
    assert_eq!(outputs, vec![Anchor::TopCenter, Anchor::BottomCenter]);
    assert!(!item.is_target());
}

#[test]
fn mail_and_db_are_container_targets() {
    let mut c = canvas();
    for id in [c.add_mail(), c.add_db()] {
        let item = c.item(id.as_str()).expect("item");
        assert!(item.inputs().is_empty());
        assert!(item.outputs().is_empty());
        assert_eq!(item.target_anchor(), Some(Anchor::LeftMiddle));
    }
}

#[test]
fn presets_use_icon_size_and_url() {
    let mut c = canvas();
    let id = c.add_mail();
    let item = c.item(id.as_str()).expect("item");
    assert_eq!(item.width(), 64.0);
    assert_eq!(item.height(), 64.0);
    assert_eq!(item.content(), &ItemContent::Image { src: "images/mail.png".into() });
}

#[test]
fn image_keeps_declared_size() {
    let mut c = canvas();
    let id = c.add_image("pic.png", Some(20.0), Some(30.0));
    let item = c.item(id.as_str()).expect("item");
    assert_eq!(item.width(), 20.0);
    assert_eq!(item.height(), 30.0);
    assert_eq!(item.content(), &ItemContent::Image { src: "pic.png".into() });
}

#[test]
fn custom_wraps_markup_with_default_size() {
    let mut c = canvas();
    let id = c.add_custom("<b>hi</b>", None, None);
    let item = c.item(id.as_str()).expect("item");
    assert_eq!(item.handle(), HANDLE_CUSTOM);
    assert_eq!(item.content(), &ItemContent::Markup("<b>hi</b>".into()));
    assert_eq!(item.width(), 100.0);
}

#[test]
fn create_with_taken_id_is_refused() {
    let mut c = canvas();
    let id = c.add_item();
    assert_eq!(c.create_with_id(id.clone(), Variant::Mail, None, None), None);
    assert_eq!(c.len(), 1);
    assert_eq!(c.item(id.as_str()).map(|i| i.handle()), Some(HANDLE_ITEM));
}

#[test]
fn mail_to_db_connect_is_noop() {
    let mut c = canvas();
    let mail = c.add_mail();
    let db = c.add_db();
    assert_eq!(c.connect(mail.as_str(), db.as_str()), None);
    assert!(c.engine().connections().is_empty());
}

#[test]
fn exclusive_choice_connects_into_mail_container() {
    let mut c = canvas();
    let choice = c.add_exclusive_choice();
    let mail = c.add_mail();
    assert!(c.connect(choice.as_str(), mail.as_str()).is_some());
    assert_eq!(c.engine().connections().len(), 1);
}

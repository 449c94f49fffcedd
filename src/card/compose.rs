//! Fixed-layout card composition.
//!
//! [`compose`] is a pure function of the record: every call builds the whole scene from scratch.

use crate::assets::store::DecorativeAsset;
use crate::card::format::{card_upper, format_card_date};
use crate::card::record::CardRecord;
use crate::card::scene::{
    CardScene, FontWeight, ImageSource, SceneElement, TextAlign, TextRun,
};
use crate::foundation::core::{Rect, Rgba8, SurfaceSize};

/// Card canvas size at scale 1.
pub const CARD_SIZE: SurfaceSize = SurfaceSize::new(800, 520);

const LEFT_TITLE: &str = "JAMHURI YA KENYA";
const RIGHT_TITLE: &str = "REPUBLIC OF KENYA";
const MARGIN_X: f64 = 40.0;
const RIGHT_X: f64 = 640.0;
const TITLE_BASELINE: f64 = 60.0;

const COAT_OF_ARMS: Rect = Rect::new(295.0, 70.0, 385.0, 130.0);
const SHIELD: Rect = Rect::new(325.0, 135.0, 365.0, 195.0);
const FINGERPRINT: Rect = Rect::new(600.0, 340.0, 740.0, 460.0);

const NUMBERS_BASELINE: f64 = 160.0;
const SERIAL_VALUE_X: f64 = 180.0;
const ID_VALUE_X: f64 = 770.0;

const NAME_LABEL_BASELINE: f64 = 200.0;
const NAME_BASELINE: f64 = 230.0;

/// Photo slot; the photo is stretched to fill it exactly.
pub const PHOTO_RECT: Rect = Rect::new(40.0, 245.0, 240.0, 475.0);
/// Signature slot, directly below the photo.
pub const SIGNATURE_RECT: Rect = Rect::new(150.0, 485.0, 240.0, 515.0);
const SIGN_LABEL_BASELINE: f64 = 505.0;

const DETAILS_X: f64 = 270.0;
const DETAILS_TOP: f64 = 245.0;
const DETAILS_GAP: f64 = 35.0;
const DETAILS_VALUE_X: f64 = 520.0;

const TITLE_PX: f32 = 32.0;
const NUMBER_LABEL_PX: f32 = 15.0;
const EMPHASIS_PX: f32 = 22.0;
const LABEL_PX: f32 = 13.0;
const DETAIL_VALUE_PX: f32 = 20.0;

/// Build the card scene for `record`.
#[tracing::instrument(skip(record), fields(id = %record.id_number))]
pub fn compose(record: &CardRecord) -> CardScene {
    let mut s = SceneBuilder::default();

    s.fill(
        Rect::new(0.0, 0.0, f64::from(CARD_SIZE.width), f64::from(CARD_SIZE.height)),
        Rgba8::WHITE,
    );

    // Header.
    let title = |text: &str, x: f64, align: TextAlign| TextRun {
        text: text.to_owned(),
        x,
        baseline: TITLE_BASELINE,
        size_px: TITLE_PX,
        weight: FontWeight::Bold,
        align,
        color: Rgba8::HEADER_GREEN,
    };
    s.text(title(LEFT_TITLE, MARGIN_X, TextAlign::Left));
    s.text(title(RIGHT_TITLE, RIGHT_X, TextAlign::Right));
    s.image(ImageSource::Asset(DecorativeAsset::CoatOfArms), COAT_OF_ARMS, false);
    s.image(ImageSource::Asset(DecorativeAsset::Shield), SHIELD, false);

    // Serial and ID numbers.
    s.label("SERIAL NUMBER:", MARGIN_X, NUMBERS_BASELINE, NUMBER_LABEL_PX, TextAlign::Left);
    s.value(
        &record.serial_number,
        SERIAL_VALUE_X,
        NUMBERS_BASELINE,
        EMPHASIS_PX,
        FontWeight::Bold,
        TextAlign::Left,
    );
    s.label("ID NUMBER:", RIGHT_X, NUMBERS_BASELINE, NUMBER_LABEL_PX, TextAlign::Right);
    s.value(
        &record.id_number,
        ID_VALUE_X,
        NUMBERS_BASELINE,
        EMPHASIS_PX,
        FontWeight::Bold,
        TextAlign::Right,
    );

    // Name.
    s.label("FULL NAMES", MARGIN_X, NAME_LABEL_BASELINE, LABEL_PX, TextAlign::Left);
    s.value(
        &card_upper(&record.full_name),
        MARGIN_X,
        NAME_BASELINE,
        EMPHASIS_PX,
        FontWeight::Bold,
        TextAlign::Left,
    );

    // Photo and signature.
    s.image(ImageSource::Photo, PHOTO_RECT, true);
    s.label(
        "HOLDER'S SIGN.",
        PHOTO_RECT.x0,
        SIGN_LABEL_BASELINE,
        LABEL_PX,
        TextAlign::Left,
    );
    s.image(ImageSource::Signature, SIGNATURE_RECT, false);

    // Details column.
    let rows = [
        ("DATE OF BIRTH", format_card_date(record.date_of_birth)),
        ("SEX", card_upper(&record.sex)),
        ("DISTRICT OF BIRTH", card_upper(&record.district)),
        ("PLACE OF ISSUE", card_upper(&record.place_of_issue)),
        ("DATE OF ISSUE", format_card_date(record.date_of_issue)),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let baseline = DETAILS_TOP + DETAILS_GAP * i as f64;
        s.label(label, DETAILS_X, baseline, LABEL_PX, TextAlign::Left);
        s.value(
            value,
            DETAILS_VALUE_X,
            baseline,
            DETAIL_VALUE_PX,
            FontWeight::Regular,
            TextAlign::Left,
        );
    }

    s.image(ImageSource::Asset(DecorativeAsset::Fingerprint), FINGERPRINT, false);

    CardScene {
        size: CARD_SIZE,
        elements: s.elements,
    }
}

#[derive(Default)]
struct SceneBuilder {
    elements: Vec<SceneElement>,
}

impl SceneBuilder {
    fn fill(&mut self, rect: Rect, color: Rgba8) {
        self.elements.push(SceneElement::Fill { rect, color });
    }

    fn text(&mut self, run: TextRun) {
        self.elements.push(SceneElement::Text(run));
    }

    fn image(&mut self, source: ImageSource, rect: Rect, clip: bool) {
        self.elements.push(SceneElement::Image { source, rect, clip });
    }

    fn label(&mut self, text: &str, x: f64, baseline: f64, size_px: f32, align: TextAlign) {
        self.value(text, x, baseline, size_px, FontWeight::Bold, align);
    }

    fn value(
        &mut self,
        text: &str,
        x: f64,
        baseline: f64,
        size_px: f32,
        weight: FontWeight,
        align: TextAlign,
    ) {
        self.text(TextRun {
            text: text.to_owned(),
            x,
            baseline,
            size_px,
            weight,
            align,
            color: Rgba8::INK,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/card/compose.rs"]
mod tests;

//! Vector field sampling.
//!
//! A field is drawn as a handful of unit arrows scattered around a charge.
//! Start points are jittered with a seeded generator, so the same spec always
//! yields the same arrows.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use tableau_core::{Direction, Point3D, TableauError, TableauResult};
use tableau_ir::{ElementContent, ElementId, FieldMode, FieldSpec, Placement, PointRef};

use crate::composer::{Composer, ElementHandle};

/// Start and end point of every arrow of the field, in index order.
pub fn sample(field: &FieldSpec) -> TableauResult<Vec<(Point3D, Point3D)>> {
    if field.count == 0 {
        return Err(TableauError::construction(format!(
            "field '{}' samples no arrows",
            field.id
        )));
    }
    if !(field.jitter >= 0.0 && field.jitter.is_finite()) {
        return Err(TableauError::construction(format!(
            "field '{}' has an invalid jitter {}",
            field.id, field.jitter
        )));
    }
    if !(field.length > 0.0 && field.length.is_finite()) {
        return Err(TableauError::construction(format!(
            "field '{}' has a non-positive arrow length",
            field.id
        )));
    }

    let uniform = match field.mode {
        FieldMode::Uniform => Some((field.origin - field.toward).normalized().ok_or_else(|| {
            TableauError::construction(format!(
                "field '{}': origin and toward are the same point",
                field.id
            ))
        })?),
        FieldMode::Radial => None,
    };

    let mut rng = StdRng::seed_from_u64(field.seed);
    let j = field.jitter;
    let arrows = (0..field.count)
        .map(|_| {
            let start = field.origin + Point3D::xy(rng.gen_range(-j..=j), rng.gen_range(-j..=j));
            let direction = uniform.unwrap_or_else(|| {
                (start - field.origin)
                    .normalized()
                    .unwrap_or_else(|| Direction::Right.unit())
            });
            (start, start + direction * field.length)
        })
        .collect();
    Ok(arrows)
}

/// Add the field's arrows to the composer, grouped under the field id.
pub fn add_field(composer: &mut Composer, field: &FieldSpec) -> TableauResult<ElementHandle> {
    let arrows = sample(field)?;
    let mut ids: Vec<ElementId> = Vec::with_capacity(arrows.len());
    for (index, (start, end)) in arrows.into_iter().enumerate() {
        let id = field.arrow_id(index);
        composer.add_styled_element(
            id.clone(),
            ElementContent::Arrow {
                start: PointRef::At(start),
                end: PointRef::At(end),
                buff: Some(0.0),
            },
            Placement::origin(),
            field.style,
        )?;
        ids.push(id);
    }
    tracing::debug!("sampled {} arrows for field '{}'", ids.len(), field.id);
    composer.add_group(field.id.clone(), &ids, None)
}

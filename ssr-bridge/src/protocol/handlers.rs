//! Scene and audio commands that can be chained within a single call.
//!
//! Every handler validates its argument completely before consuming it or
//! touching the scene, except `source_model`, which assigns token by token.

use super::cursor::ArgCursor;
use super::outputs::OutputSlots;
use super::value::Array;
use crate::SAMPLE_PRECISION;
use crate::error::{BridgeError, Result};
use crate::events::BridgeEvent;
use crate::math::{Orientation, Position};
use crate::renderer::Renderer;
use crate::scene::{SourceId, SourceModel};
use crate::session::Session;
use crossbeam_channel::Sender;

fn emit(events: &Sender<BridgeEvent>, event: BridgeEvent) -> Result<()> {
    events
        .send(event)
        .map_err(|e| BridgeError::Engine(format!("Failed to send bridge event: {}", e)))
}

fn require_real(array: &Array, what: &str) -> Result<()> {
    if array.is_real() && array.is_numeric() {
        Ok(())
    } else {
        Err(BridgeError::usage(format!("{} must be real numbers!", what)))
    }
}

fn require_columns(array: &Array, context: &'static str, expected: usize) -> Result<()> {
    if array.cols() == expected {
        Ok(())
    } else {
        Err(BridgeError::columns(context, expected, array.cols()))
    }
}

/// Rows of a 2D coordinate matrix: 3 is its own error, anything else but 2
/// is a dimension mismatch.
fn require_planar(array: &Array) -> Result<()> {
    match array.rows() {
        2 => Ok(()),
        3 => Err(BridgeError::ThreeDimensional),
        rows => Err(BridgeError::rows("x and y coordinates", 2, rows)),
    }
}

fn source_ids(count: usize) -> impl Iterator<Item = SourceId> {
    (0..count).map(SourceId::from_index)
}

pub fn source_position<R: Renderer>(
    session: &mut Session<R>,
    cursor: &mut ArgCursor<'_>,
    events: &Sender<BridgeEvent>,
) -> Result<()> {
    let array = cursor.peek_array("source_position")?;
    require_real(array, "Source positions")?;
    require_columns(array, "number of sources", session.in_channels())?;
    require_planar(array)?;
    let coordinates = array
        .real_values()
        .ok_or_else(|| BridgeError::usage("Source positions must be real numbers!"))?;
    cursor.advance();

    for (id, xy) in source_ids(session.in_channels()).zip(coordinates.chunks_exact(2)) {
        let source = session.renderer_mut().get_source(id)?;
        let old_position = source.position;
        source.position = Position::from_xy(xy[0] as f32, xy[1] as f32);
        let new_position = source.position;
        emit(
            events,
            BridgeEvent::SourcePositionChanged {
                source_id: id,
                old_position,
                new_position,
            },
        )?;
    }
    Ok(())
}

pub fn source_orientation<R: Renderer>(
    session: &mut Session<R>,
    cursor: &mut ArgCursor<'_>,
    events: &Sender<BridgeEvent>,
) -> Result<()> {
    let array = cursor.peek_array("source_orientation")?;
    require_real(array, "Source orientations")?;
    require_columns(array, "number of sources", session.in_channels())?;
    if array.rows() != 1 {
        return Err(BridgeError::usage(
            "Last argument must be a row vector of angles!",
        ));
    }
    let angles = array
        .real_values()
        .ok_or_else(|| BridgeError::usage("Source orientations must be real numbers!"))?;
    cursor.advance();

    for (id, angle) in source_ids(session.in_channels()).zip(angles) {
        let source = session.renderer_mut().get_source(id)?;
        source.orientation = Orientation::from_azimuth(angle as f32);
        let orientation = source.orientation;
        emit(
            events,
            BridgeEvent::SourceOrientationChanged {
                source_id: id,
                orientation,
            },
        )?;
    }
    Ok(())
}

pub fn source_mute<R: Renderer>(
    session: &mut Session<R>,
    cursor: &mut ArgCursor<'_>,
    events: &Sender<BridgeEvent>,
) -> Result<()> {
    let array = cursor.peek_array("source_mute")?;
    require_columns(array, "number of sources", session.in_channels())?;
    let Some(mutes) = array.logicals() else {
        return Err(BridgeError::usage(
            "Argument after 'source_mute' must be of logical type!",
        ));
    };
    if array.rows() != 1 {
        return Err(BridgeError::usage(
            "Argument after 'source_mute' must be a row vector!",
        ));
    }
    cursor.advance();

    for (id, &mute) in source_ids(session.in_channels()).zip(mutes) {
        session.renderer_mut().get_source(id)?.mute = mute;
        emit(events, BridgeEvent::SourceMuteChanged { source_id: id, mute })?;
    }
    Ok(())
}

pub fn source_model<R: Renderer>(
    session: &mut Session<R>,
    cursor: &mut ArgCursor<'_>,
) -> Result<()> {
    let count = session.in_channels();
    if cursor.remaining() < count {
        return Err(BridgeError::usage(
            "Specify as many model strings as there are sources!",
        ));
    }

    for id in source_ids(count) {
        let token = cursor.take_text(
            "All further arguments to 'source_model' must be valid source model strings!",
        )?;
        let model: SourceModel = token.parse()?;
        session.renderer_mut().get_source(id)?.model = model;
    }
    Ok(())
}

pub fn reference_position<R: Renderer>(
    session: &mut Session<R>,
    cursor: &mut ArgCursor<'_>,
    events: &Sender<BridgeEvent>,
) -> Result<()> {
    let array = cursor.peek_array("reference_position")?;
    require_real(array, "Reference position")?;
    require_columns(array, "reference position", 1)?;
    require_planar(array)?;
    let (Some(x), Some(y)) = (array.get(0, 0), array.get(1, 0)) else {
        return Err(BridgeError::rows("x and y coordinates", 2, array.rows()));
    };
    cursor.advance();

    let reference = &mut session.renderer_mut().scene_mut().reference;
    reference.position = Position::from_xy(x as f32, y as f32);
    let (position, orientation) = (reference.position, reference.orientation);
    emit(
        events,
        BridgeEvent::ReferencePoseChanged {
            position,
            orientation,
        },
    )
}

pub fn reference_orientation<R: Renderer>(
    session: &mut Session<R>,
    cursor: &mut ArgCursor<'_>,
    events: &Sender<BridgeEvent>,
) -> Result<()> {
    let array = cursor.peek_array("reference_orientation")?;
    require_real(array, "Reference orientation")?;
    let Some(angle) = array.as_scalar() else {
        return Err(BridgeError::usage("Last argument must be a scalar"));
    };
    cursor.advance();

    let reference = &mut session.renderer_mut().scene_mut().reference;
    reference.orientation = Orientation::from_azimuth(angle as f32);
    let (position, orientation) = (reference.position, reference.orientation);
    emit(
        events,
        BridgeEvent::ReferencePoseChanged {
            position,
            orientation,
        },
    )
}

/// Exchange one audio block. Consumes exactly one output slot, so `process`
/// appears at most once per call.
pub fn process<R: Renderer>(
    session: &mut Session<R>,
    cursor: &mut ArgCursor<'_>,
    outputs: &mut OutputSlots,
    events: &Sender<BridgeEvent>,
) -> Result<()> {
    outputs.expect_exactly_one("process")?;
    let array = cursor.peek_array("process")?;

    let block_size = session.block_size();
    if array.rows() != block_size {
        return Err(BridgeError::rows("block size", block_size, array.rows()));
    }
    require_columns(array, "number of sources", session.in_channels())?;
    require_real(array, "Argument to 'process'")?;
    let Some(input) = array.samples() else {
        return Err(BridgeError::usage(format!(
            "This function only works with {} precision data!",
            SAMPLE_PRECISION
        )));
    };

    let output = session.process(input)?;
    cursor.advance();

    outputs.push(Array::from_samples(
        block_size,
        session.out_channels(),
        output,
    )?);
    emit(events, BridgeEvent::BlockProcessed { block_size })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Sample;
    use crate::config::ParameterMap;
    use crate::protocol::value::Arg;
    use crate::renderer::DirectMixRenderer;
    use crossbeam_channel::Receiver;

    fn session(sources: usize) -> Session<DirectMixRenderer> {
        let params: ParameterMap = [("block_size", "4"), ("loudspeakers", "2")]
            .into_iter()
            .collect();
        Session::start(sources, params).unwrap()
    }

    fn channel() -> (Sender<BridgeEvent>, Receiver<BridgeEvent>) {
        crossbeam_channel::unbounded()
    }

    fn samples(rows: usize, cols: usize, value: Sample) -> Array {
        Array::from_samples(rows, cols, vec![value; rows * cols]).unwrap()
    }

    #[test]
    fn test_source_position_sets_xy() {
        let mut session = session(2);
        let (tx, rx) = channel();
        let args = vec![Arg::from(
            Array::from_rows(&[[1.0, 3.0], [2.0, 4.0]]).unwrap(),
        )];
        let mut cursor = ArgCursor::new(&args);

        source_position(&mut session, &mut cursor, &tx).unwrap();

        assert!(cursor.is_empty());
        let scene = session.renderer().scene();
        assert_eq!(scene.sources()[0].position, Position::new(1.0, 2.0, 0.0));
        assert_eq!(scene.sources()[1].position, Position::new(3.0, 4.0, 0.0));
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn test_source_position_row_errors() {
        let mut session = session(1);
        let (tx, _rx) = channel();

        let three = vec![Arg::from(Array::double(3, 1, vec![0.0; 3]).unwrap())];
        let err = source_position(&mut session, &mut ArgCursor::new(&three), &tx).unwrap_err();
        assert_eq!(err, BridgeError::ThreeDimensional);

        for rows in [1, 4] {
            let args = vec![Arg::from(Array::double(rows, 1, vec![0.0; rows]).unwrap())];
            let mut cursor = ArgCursor::new(&args);
            let err = source_position(&mut session, &mut cursor, &tx).unwrap_err();
            assert_eq!(err, BridgeError::rows("x and y coordinates", 2, rows));
            assert_eq!(cursor.remaining(), 1);
        }
    }

    #[test]
    fn test_source_position_checks_columns_first() {
        let mut session = session(2);
        let (tx, _rx) = channel();
        let args = vec![Arg::from(Array::double(3, 1, vec![0.0; 3]).unwrap())];

        let err = source_position(&mut session, &mut ArgCursor::new(&args), &tx).unwrap_err();
        assert_eq!(err, BridgeError::columns("number of sources", 2, 1));
    }

    #[test]
    fn test_source_orientation_needs_row_vector() {
        let mut session = session(2);
        let (tx, _rx) = channel();

        let column = vec![Arg::from(Array::double(2, 2, vec![0.0; 4]).unwrap())];
        assert_eq!(
            source_orientation(&mut session, &mut ArgCursor::new(&column), &tx)
                .unwrap_err()
                .to_string(),
            "Last argument must be a row vector of angles!"
        );

        let row = vec![Arg::from(Array::row(vec![90.0, -45.0]))];
        source_orientation(&mut session, &mut ArgCursor::new(&row), &tx).unwrap();
        let sources = session.renderer().scene().sources();
        assert_eq!(sources[0].orientation, Orientation::new(90.0, 0.0));
        assert_eq!(sources[1].orientation, Orientation::new(-45.0, 0.0));
    }

    #[test]
    fn test_source_mute_type_checks() {
        let mut session = session(2);
        let (tx, _rx) = channel();

        let numeric = vec![Arg::from(Array::row(vec![1.0, 0.0]))];
        assert_eq!(
            source_mute(&mut session, &mut ArgCursor::new(&numeric), &tx)
                .unwrap_err()
                .to_string(),
            "Argument after 'source_mute' must be of logical type!"
        );

        let column = vec![Arg::from(
            Array::logical(2, 2, vec![true, false, true, false]).unwrap(),
        )];
        assert_eq!(
            source_mute(&mut session, &mut ArgCursor::new(&column), &tx)
                .unwrap_err()
                .to_string(),
            "Argument after 'source_mute' must be a row vector!"
        );

        let ok = vec![Arg::from(Array::logical_row(vec![false, true]))];
        source_mute(&mut session, &mut ArgCursor::new(&ok), &tx).unwrap();
        let sources = session.renderer().scene().sources();
        assert!(!sources[0].mute);
        assert!(sources[1].mute);
    }

    #[test]
    fn test_source_model_partial_update() {
        let mut session = session(3);
        let args = vec![Arg::from("plane"), Arg::from("spherical"), Arg::from("line")];
        let mut cursor = ArgCursor::new(&args);

        let err = source_model(&mut session, &mut cursor).unwrap_err();
        assert_eq!(err, BridgeError::Conversion("spherical".into()));

        let sources = session.renderer().scene().sources();
        assert_eq!(sources[0].model, SourceModel::Plane);
        assert_eq!(sources[1].model, SourceModel::Point);
        assert_eq!(sources[2].model, SourceModel::Point);
    }

    #[test]
    fn test_source_model_needs_enough_tokens() {
        let mut session = session(2);
        let args = vec![Arg::from("point")];
        let err = source_model(&mut session, &mut ArgCursor::new(&args)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Specify as many model strings as there are sources!"
        );
        assert_eq!(session.renderer().scene().sources()[0].model, SourceModel::Point);
    }

    #[test]
    fn test_reference_pose() {
        let mut session = session(1);
        let (tx, rx) = channel();
        let args = vec![
            Arg::from(Array::double(2, 1, vec![0.5, -1.0]).unwrap()),
            Arg::from(Array::scalar(30.0)),
        ];
        let mut cursor = ArgCursor::new(&args);

        reference_position(&mut session, &mut cursor, &tx).unwrap();
        reference_orientation(&mut session, &mut cursor, &tx).unwrap();

        let reference = session.renderer().scene().reference;
        assert_eq!(reference.position, Position::new(0.5, -1.0, 0.0));
        assert_eq!(reference.orientation, Orientation::new(30.0, 0.0));
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn test_reference_orientation_needs_scalar() {
        let mut session = session(1);
        let (tx, _rx) = channel();
        let args = vec![Arg::from(Array::row(vec![1.0, 2.0]))];
        assert_eq!(
            reference_orientation(&mut session, &mut ArgCursor::new(&args), &tx)
                .unwrap_err()
                .to_string(),
            "Last argument must be a scalar"
        );
    }

    #[test]
    fn test_process_fills_output_slot() {
        let mut session = session(1);
        let (tx, rx) = channel();
        let args = vec![Arg::from(samples(4, 1, 0.5))];
        let mut cursor = ArgCursor::new(&args);
        let mut outputs = OutputSlots::new(1);

        process(&mut session, &mut cursor, &mut outputs, &tx).unwrap();

        assert!(cursor.is_empty());
        let values = outputs.into_values();
        assert_eq!(values[0].rows(), 4);
        assert_eq!(values[0].cols(), 2);
        assert_eq!(
            rx.try_recv().unwrap(),
            BridgeEvent::BlockProcessed { block_size: 4 }
        );
    }

    #[test]
    fn test_process_rejects_wrong_rows() {
        let mut session = session(1);
        let (tx, rx) = channel();
        let args = vec![Arg::from(samples(3, 1, 0.0))];
        let mut outputs = OutputSlots::new(1);

        let err = process(&mut session, &mut ArgCursor::new(&args), &mut outputs, &tx).unwrap_err();
        assert_eq!(err, BridgeError::rows("block size", 4, 3));
        assert_eq!(outputs.remaining(), 1);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_process_rejects_other_precision() {
        let mut session = session(1);
        let (tx, _rx) = channel();
        #[cfg(not(feature = "double-precision"))]
        let input = Array::double(4, 1, vec![0.0; 4]).unwrap();
        #[cfg(feature = "double-precision")]
        let input = Array::single(4, 1, vec![0.0; 4]).unwrap();
        let args = vec![Arg::from(input)];
        let mut outputs = OutputSlots::new(1);

        let err = process(&mut session, &mut ArgCursor::new(&args), &mut outputs, &tx).unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("This function only works with {} precision data!", SAMPLE_PRECISION)
        );
    }

    #[test]
    fn test_process_needs_one_output() {
        let mut session = session(1);
        let (tx, _rx) = channel();
        let args = vec![Arg::from(samples(4, 1, 0.0))];

        let mut none = OutputSlots::new(0);
        assert!(process(&mut session, &mut ArgCursor::new(&args), &mut none, &tx).is_err());

        let mut two = OutputSlots::new(2);
        assert!(process(&mut session, &mut ArgCursor::new(&args), &mut two, &tx).is_err());
    }
}

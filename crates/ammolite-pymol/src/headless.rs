//! In-process engine implementation
//!
//! A lightweight [`EngineLike`] backend that stores indexed models in
//! memory, for scripting against the bridge without a running viewer and
//! for exercising the selection contract in tests. Its selection evaluator
//! understands exactly the expression shapes the compiler emits:
//! `model <name>`, optionally ANDed with a parenthesized disjunction of
//! `index a-b` ranges or the `none` clause.

use ahash::AHashMap;

use crate::chempy::IndexedModel;
use crate::command::CommandSpec;
use crate::engine::{EngineError, EngineLike, EngineResult};

struct StoredObject {
    model: IndexedModel,
    /// One coordinate array per state; state 1 is the model's own
    coordsets: Vec<Vec<[f32; 3]>>,
}

/// In-memory engine backend
#[derive(Default)]
pub struct HeadlessEngine {
    objects: AHashMap<String, StoredObject>,
    parameters: AHashMap<String, String>,
    history: Vec<String>,
}

impl HeadlessEngine {
    /// Create an empty engine
    pub fn new() -> Self {
        HeadlessEngine::default()
    }

    /// Commands dispatched so far, in engine command-line form
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Look up a parameter value
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    /// Evaluate a selection to the 0-based indices of matching atoms
    pub fn eval_indices(&self, selection: &str) -> EngineResult<Vec<usize>> {
        let (name, clause) = split_selection(selection)?;
        let object = self
            .objects
            .get(name)
            .ok_or_else(|| EngineError::ObjectNotFound(name.to_string()))?;
        let n = object.model.atom_count();

        let mask = match clause {
            None => vec![true; n],
            Some(inner) => eval_clause(inner, n)?,
        };
        Ok(mask
            .iter()
            .enumerate()
            .filter(|(_, &selected)| selected)
            .map(|(i, _)| i)
            .collect())
    }

    fn get(&self, name: &str) -> EngineResult<&StoredObject> {
        self.objects
            .get(name)
            .ok_or_else(|| EngineError::ObjectNotFound(name.to_string()))
    }

    fn state_coords<'a>(&self, object: &'a StoredObject, name: &str, state: usize) -> EngineResult<&'a [[f32; 3]]> {
        if state == 0 || state > object.coordsets.len() {
            return Err(EngineError::StateOutOfBounds {
                name: name.to_string(),
                state,
                count: object.coordsets.len(),
            });
        }
        Ok(&object.coordsets[state - 1])
    }
}

impl EngineLike for HeadlessEngine {
    fn load_model(&mut self, model: IndexedModel, name: &str) -> EngineResult<()> {
        let coords = model.coords();
        self.objects.insert(
            name.to_string(),
            StoredObject {
                model,
                coordsets: vec![coords],
            },
        );
        Ok(())
    }

    fn load_coordset(&mut self, coords: Vec<[f32; 3]>, name: &str) -> EngineResult<()> {
        let object = self
            .objects
            .get_mut(name)
            .ok_or_else(|| EngineError::ObjectNotFound(name.to_string()))?;
        let expected = object.model.atom_count();
        if coords.len() != expected {
            return Err(EngineError::CoordinateMismatch {
                expected,
                actual: coords.len(),
            });
        }
        object.coordsets.push(coords);
        Ok(())
    }

    fn get_model(&self, name: &str, state: usize) -> EngineResult<IndexedModel> {
        let object = self.get(name)?;
        let coords = self.state_coords(object, name, state)?;
        let mut model = object.model.clone();
        if !model.set_coords(coords) {
            return Err(EngineError::CoordinateMismatch {
                expected: model.atom_count(),
                actual: coords.len(),
            });
        }
        Ok(model)
    }

    fn get_coordset(&self, name: &str, state: usize) -> EngineResult<Vec<[f32; 3]>> {
        let object = self.get(name)?;
        Ok(self.state_coords(object, name, state)?.to_vec())
    }

    fn count_states(&self, name: &str) -> EngineResult<usize> {
        Ok(self.get(name)?.coordsets.len())
    }

    fn count_atoms(&self, selection: &str) -> EngineResult<usize> {
        Ok(self.eval_indices(selection)?.len())
    }

    fn object_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.objects.keys().cloned().collect();
        names.sort();
        names
    }

    fn execute(&mut self, spec: &CommandSpec) -> EngineResult<()> {
        log::debug!("PyMOL> {}", spec);
        self.history.push(spec.to_string());
        Ok(())
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> EngineResult<()> {
        self.parameters.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn delete_object(&mut self, name: &str) -> EngineResult<()> {
        self.objects
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| EngineError::ObjectNotFound(name.to_string()))
    }

    fn reinitialize(&mut self) -> EngineResult<()> {
        self.objects.clear();
        self.parameters.clear();
        self.history.clear();
        Ok(())
    }
}

/// Split a selection into its object name and optional clause
fn split_selection(selection: &str) -> EngineResult<(&str, Option<&str>)> {
    let rest = selection
        .trim()
        .strip_prefix("model ")
        .ok_or_else(|| selection_error(selection))?;
    match rest.split_once(" and ") {
        None => {
            let name = rest.trim();
            if name.is_empty() || name.contains(' ') {
                return Err(selection_error(selection));
            }
            Ok((name, None))
        }
        Some((name, clause)) => {
            let inner = clause
                .trim()
                .strip_prefix('(')
                .and_then(|c| c.strip_suffix(')'))
                .ok_or_else(|| selection_error(selection))?;
            Ok((name.trim(), Some(inner.trim())))
        }
    }
}

/// Evaluate a parenthesized clause to a boolean mask of length `n`
fn eval_clause(inner: &str, n: usize) -> EngineResult<Vec<bool>> {
    let mut mask = vec![false; n];
    if inner == "none" {
        return Ok(mask);
    }
    for term in inner.split(" or ") {
        let spec = term
            .trim()
            .strip_prefix("index ")
            .ok_or_else(|| selection_error(term))?;
        let (first, last) = spec.split_once('-').ok_or_else(|| selection_error(term))?;
        let first: usize = first
            .trim()
            .parse()
            .map_err(|_| selection_error(term))?;
        let last: usize = last.trim().parse().map_err(|_| selection_error(term))?;
        if first == 0 || first > last {
            return Err(selection_error(term));
        }
        // 1-based inclusive, clipped to the object's atom count
        for i in first..=last.min(n) {
            mask[i - 1] = true;
        }
    }
    Ok(mask)
}

fn selection_error(input: &str) -> EngineError {
    EngineError::Selection(format!("cannot evaluate '{}'", input.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chempy::ModelAtom;
    use crate::command::CommandKind;

    fn model_with(n: usize) -> IndexedModel {
        let mut model = IndexedModel::new();
        for i in 0..n {
            model.atom.push(ModelAtom {
                name: format!("C{i}"),
                coord: [i as f32, 0.0, 0.0],
                index: (i + 1) as u32,
                ..Default::default()
            });
        }
        model
    }

    #[test]
    fn test_load_and_snapshot() {
        let mut engine = HeadlessEngine::new();
        engine.load_model(model_with(3), "m").unwrap();

        assert_eq!(engine.count_states("m").unwrap(), 1);
        let snapshot = engine.get_model("m", 1).unwrap();
        assert_eq!(snapshot.atom_count(), 3);
        assert_eq!(snapshot.atom[2].coord, [2.0, 0.0, 0.0]);
    }

    #[test]
    fn test_coordset_states() {
        let mut engine = HeadlessEngine::new();
        engine.load_model(model_with(2), "m").unwrap();
        engine
            .load_coordset(vec![[5.0, 0.0, 0.0], [6.0, 0.0, 0.0]], "m")
            .unwrap();

        assert_eq!(engine.count_states("m").unwrap(), 2);
        assert_eq!(engine.get_coordset("m", 2).unwrap()[0], [5.0, 0.0, 0.0]);
        // State 2's snapshot carries state 2's coordinates
        assert_eq!(engine.get_model("m", 2).unwrap().atom[1].coord, [6.0, 0.0, 0.0]);

        assert_eq!(
            engine.get_coordset("m", 3),
            Err(EngineError::StateOutOfBounds {
                name: "m".to_string(),
                state: 3,
                count: 2,
            })
        );
    }

    #[test]
    fn test_coordset_length_check() {
        let mut engine = HeadlessEngine::new();
        engine.load_model(model_with(2), "m").unwrap();
        assert_eq!(
            engine.load_coordset(vec![[0.0; 3]], "m"),
            Err(EngineError::CoordinateMismatch {
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_count_atoms() {
        let mut engine = HeadlessEngine::new();
        engine.load_model(model_with(5), "m").unwrap();

        assert_eq!(engine.count_atoms("model m").unwrap(), 5);
        assert_eq!(
            engine
                .count_atoms("model m and (index 2-3 or index 5-5)")
                .unwrap(),
            3
        );
        assert_eq!(engine.count_atoms("model m and (none)").unwrap(), 0);
        assert_eq!(
            engine.count_atoms("model missing"),
            Err(EngineError::ObjectNotFound("missing".to_string()))
        );
    }

    #[test]
    fn test_eval_indices() {
        let mut engine = HeadlessEngine::new();
        engine.load_model(model_with(6), "m").unwrap();

        assert_eq!(
            engine
                .eval_indices("model m and (index 1-2 or index 6-6)")
                .unwrap(),
            vec![0, 1, 5]
        );
        // Ranges are clipped to the atom count
        assert_eq!(
            engine.eval_indices("model m and (index 5-9)").unwrap(),
            vec![4, 5]
        );
    }

    #[test]
    fn test_malformed_selection() {
        let mut engine = HeadlessEngine::new();
        engine.load_model(model_with(2), "m").unwrap();

        assert!(matches!(
            engine.count_atoms("m and (index 1-1)"),
            Err(EngineError::Selection(_))
        ));
        assert!(matches!(
            engine.count_atoms("model m and index 1-1"),
            Err(EngineError::Selection(_))
        ));
        assert!(matches!(
            engine.count_atoms("model m and (index 3-1)"),
            Err(EngineError::Selection(_))
        ));
    }

    #[test]
    fn test_execute_records_history() {
        let mut engine = HeadlessEngine::new();
        engine.load_model(model_with(2), "m").unwrap();
        engine
            .execute(&CommandSpec {
                kind: CommandKind::Show,
                value: Some("sticks".to_string()),
                selection: "model m".to_string(),
                state: None,
            })
            .unwrap();

        assert_eq!(engine.history(), ["show sticks, model m"]);
    }

    #[test]
    fn test_delete_and_reinitialize() {
        let mut engine = HeadlessEngine::new();
        engine.load_model(model_with(2), "a").unwrap();
        engine.load_model(model_with(2), "b").unwrap();
        assert_eq!(engine.object_names(), ["a", "b"]);

        engine.delete_object("a").unwrap();
        assert_eq!(engine.object_names(), ["b"]);
        assert_eq!(
            engine.delete_object("a"),
            Err(EngineError::ObjectNotFound("a".to_string()))
        );

        engine.set_parameter("retain_order", "1").unwrap();
        engine.reinitialize().unwrap();
        assert!(engine.object_names().is_empty());
        assert_eq!(engine.parameter("retain_order"), None);
    }
}

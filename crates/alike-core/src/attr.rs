//! Attribute comparison.
//!
//! Well-known attributes have dedicated rules (`class` by suffix, `dim` with
//! zero as a wildcard, `names` with empty strings as wildcards, and so on);
//! every other attribute must be recursively alike. All rules run and each
//! failure lands in its priority slot; the most important one is reported.

use crate::alike::Alike;
use crate::error::{AlikeResult, ErrorKind};
use crate::path::Segment;
use crate::priority::{Priority, PrioritySlots};
use crate::result::{Comparison, Description, Mismatch};
use crate::settings::AttrMode;
use alike_value::{format_real, quote_str, AttrKind, Symbol, Value};
use tracing::trace;

impl<'a> Alike<'a> {
    /// Compare the attributes of two values, ignoring their contents.
    pub fn compare_attributes(&mut self, target: &Value, current: &Value) -> AlikeResult<Comparison> {
        let result = self.attributes_alike(target, current);
        self.finish()?;
        result
    }

    pub(crate) fn attributes_alike(
        &mut self,
        target: &Value,
        current: &Value,
    ) -> AlikeResult<Comparison> {
        let strict = self.settings.is_strict();
        let reverse = target.attrs.is_empty();
        if current.attrs.is_empty() && reverse {
            return Ok(Comparison::ok());
        }
        // Extra attributes on `current` only matter in strict mode.
        if reverse && !strict {
            return Ok(Comparison::ok());
        }

        let mut slots = PrioritySlots::new();
        let mut data_frame = false;
        self.guard.enter_attr();
        let scan = if reverse {
            scan_reverse(target, current, &mut slots, &mut data_frame);
            Ok(())
        } else {
            self.scan_attributes(target, current, &mut slots, &mut data_frame)
        };
        self.guard.exit_attr();
        scan?;

        let (tn, cn) = (target.attrs.len(), current.attrs.len());
        if strict && tn != cn {
            slots.record(
                Priority::Presence,
                Mismatch::new(
                    ErrorKind::AttributeMissing,
                    Description::new(
                        "have",
                        format!("{} attribute{}", tn, if tn == 1 { "" } else { "s" }),
                    ),
                )
                .with_current(Description::new("has", cn.to_string())),
            );
        }

        let selected = slots.select();
        if let Some(m) = &selected {
            trace!(kind = %m.kind, priority = ?m.priority, "attribute mismatch selected");
        }
        Ok(Comparison::from(selected).with_data_frame(data_frame))
    }

    fn scan_attributes(
        &mut self,
        target: &Value,
        current: &Value,
        slots: &mut PrioritySlots,
        data_frame: &mut bool,
    ) -> AlikeResult<()> {
        let mode = self.settings.attr_mode;
        for (name, tval) in target.attrs.iter() {
            let kind = name.attr_kind();
            let cval = current.attr(name.as_str());
            let srcref_exempt = mode == AttrMode::Default || cval.is_none();
            if kind == AttrKind::SrcRef && mode != AttrMode::Strict && srcref_exempt {
                continue;
            }
            // Absent current attributes: an empty target one never fails
            // in default mode, and `class` falls back to the implicit class.
            if cval.is_none() && mode == AttrMode::Default && tval.is_empty() {
                continue;
            }
            if cval.is_none() && (mode == AttrMode::Strict || kind != AttrKind::Class) {
                slots.record(
                    Priority::Presence,
                    Mismatch::new(
                        ErrorKind::AttributeMissing,
                        Description::new("have", format!("attribute {}", quote_str(name.as_str()))),
                    ),
                );
            }

            match kind {
                AttrKind::Class => {
                    if let Some(m) = self.class_alike(name, tval, current, data_frame)? {
                        slots.record(Priority::Class, m);
                    }
                }
                AttrKind::Names => {
                    if let Some(m) = self.names_alike(tval, cval)? {
                        slots.record(Priority::Names, m.at(Segment::Accessor("names")));
                    }
                }
                AttrKind::RowNames => {
                    if let Some(m) = self.names_alike(tval, cval)? {
                        slots.record(Priority::RowNames, m.at(Segment::Accessor("row.names")));
                    }
                }
                AttrKind::Dim => {
                    if let Some((m, implicit_class)) = self.dim_alike(name, tval, cval, target, current)? {
                        let priority = if implicit_class { Priority::Class } else { Priority::Dim };
                        slots.record(priority, m);
                    }
                }
                AttrKind::DimNames => {
                    if let Some(m) = self.dimnames_alike(tval, cval)? {
                        slots.record(Priority::DimNames, m);
                    }
                }
                AttrKind::Levels => {
                    if let Some(m) = self.levels_alike(name, tval, cval)? {
                        slots.record(Priority::Other, m);
                    }
                }
                AttrKind::Tsp => {
                    if let Some(m) = self.tsp_alike(name, tval, cval)? {
                        slots.record(Priority::TimeSeries, m);
                    }
                }
                AttrKind::SrcRef | AttrKind::Other => {
                    if let Some(m) = self.generic_alike(name, tval, cval)? {
                        slots.record(Priority::Other, m);
                    }
                }
            }
        }
        Ok(())
    }

    // === class ===

    fn class_alike(
        &mut self,
        name: &Symbol,
        tval: &Value,
        current: &Value,
        data_frame: &mut bool,
    ) -> AlikeResult<Option<Mismatch>> {
        let cval = current.attr("class");
        let Some(target_class) = tval.as_strings() else {
            return self.generic_alike(name, tval, cval);
        };
        let current_class = match cval {
            Some(c) => match c.as_strings() {
                Some(c) => c.to_vec(),
                None => return self.generic_alike(name, tval, cval),
            },
            None => current.class(),
        };
        Ok(class_mismatch(target_class, &current_class, data_frame))
    }

    // === names, row.names, levels ===

    /// Name vectors are first compared as values, then element-wise: an
    /// empty target name matches any name except in strict mode.
    fn names_alike(&mut self, tval: &Value, cval: Option<&Value>) -> AlikeResult<Option<Mismatch>> {
        let null = Value::null();
        let cval = cval.unwrap_or(&null);
        if let Some(m) = self.alike_rec(tval, cval)?.into_mismatch() {
            return Ok(Some(m));
        }
        if tval.is_empty() {
            return Ok(None);
        }
        let strict = self.settings.is_strict();
        if let (Some(t), Some(c)) = (tval.as_strings(), cval.as_strings()) {
            let found = t
                .iter()
                .zip(c)
                .enumerate()
                .find(|(_, (t, c))| (strict || !t.is_empty()) && t != c);
            return Ok(found.map(|(i, (t, c))| {
                Mismatch::new(ErrorKind::NameMismatch, Description::new("be", quote_str(t)))
                    .with_current(Description::new("is", quote_str(c)))
                    .at(Segment::Subset(i + 1))
            }));
        }
        if tval.data != cval.data {
            return Ok(Some(Mismatch::new(
                ErrorKind::NameMismatch,
                Description::new("be", "identical to target"),
            )));
        }
        Ok(None)
    }

    fn levels_alike(
        &mut self,
        name: &Symbol,
        tval: &Value,
        cval: Option<&Value>,
    ) -> AlikeResult<Option<Mismatch>> {
        let both_strings = tval.as_strings().is_some() && cval.map_or(true, |c| c.as_strings().is_some());
        if !both_strings {
            return self.generic_alike(name, tval, cval);
        }
        Ok(self
            .names_alike(tval, cval)?
            .map(|m| m.at(Segment::Accessor("levels"))))
    }

    // === dim ===

    /// Returns the failure and whether it changes the implicit class (e.g.
    /// matrix vs vector), which is reported with class priority.
    fn dim_alike(
        &mut self,
        name: &Symbol,
        tval: &Value,
        cval: Option<&Value>,
        target: &Value,
        current: &Value,
    ) -> AlikeResult<Option<(Mismatch, bool)>> {
        let generic = |ctx: &mut Self| -> AlikeResult<Option<(Mismatch, bool)>> {
            Ok(ctx.generic_alike(name, tval, cval)?.map(|m| (m, false)))
        };
        let Some(tdim) = tval.as_integers() else {
            return generic(self);
        };
        let cdim = match cval {
            Some(c) => match c.as_integers() {
                Some(d) => Some(d),
                None => return generic(self),
            },
            None => None,
        };

        if let Some((want, have)) = implicit_class_change(tdim, cdim, target, current) {
            let m = Mismatch::new(
                ErrorKind::ClassMismatch,
                Description::new("be", format!("\"{}\"", want)),
            )
            .with_current(Description::new("is", format!("\"{}\"", have)));
            return Ok(Some((m, true)));
        }

        let tn = tdim.len();
        let Some(cdim) = cdim else {
            let m = Mismatch::new(
                ErrorKind::DimensionMismatch,
                Description::new("have", format!("{} dimension{}", tn, plural(tn))),
            )
            .with_current(Description::new("has", "none"));
            return Ok(Some((m, false)));
        };
        if tn != cdim.len() {
            let m = Mismatch::new(
                ErrorKind::DimensionMismatch,
                Description::new("have", format!("{} dimension{}", tn, plural(tn))),
            )
            .with_current(Description::new("has", cdim.len().to_string()));
            return Ok(Some((m, false)));
        }
        let strict = self.settings.is_strict();
        let found = tdim
            .iter()
            .zip(cdim)
            .enumerate()
            .find(|(_, (t, c))| (strict || **t != 0) && t != c);
        Ok(found.map(|(i, (&t, &c))| {
            let text = match (tn, i) {
                (2, 0) => format!("{} row{}", t, plural(t.unsigned_abs() as usize)),
                (2, _) => format!("{} column{}", t, plural(t.unsigned_abs() as usize)),
                _ => format!("size {} at dimension {}", t, i + 1),
            };
            let m = Mismatch::new(ErrorKind::DimensionMismatch, Description::new("have", text))
                .with_current(Description::new("has", c.to_string()));
            (m, false)
        }))
    }

    // === dimnames ===

    fn dimnames_alike(&mut self, tval: &Value, cval: Option<&Value>) -> AlikeResult<Option<Mismatch>> {
        let Some(cval) = cval else {
            return Ok(Some(Mismatch::new(
                ErrorKind::AttributeMissing,
                Description::new("have", "a \"dimnames\" attribute"),
            )));
        };
        let (Some(tlist), Some(clist)) = (tval.as_list(), cval.as_list()) else {
            return self.whole_dimnames(tval, cval);
        };
        let tnames = tval.attr("names");
        let cnames = cval.attr("names");
        let names_comparable = match (tnames, cnames) {
            (None, _) => true,
            (Some(t), Some(c)) => {
                t.type_name() == c.type_name()
                    && (t.as_strings().is_some() || t.as_integers().is_some())
                    && t.len() == c.len()
            }
            (Some(_), None) => false,
        };
        if !names_comparable || (!tlist.is_empty() && tlist.len() != clist.len()) {
            return self.whole_dimnames(tval, cval);
        }

        for (key, value) in tval.attrs.iter().filter(|(k, _)| k.as_str() != "names") {
            let failure = match cval.attr(key.as_str()) {
                Some(other) => self.alike_rec(value, other)?.into_mismatch(),
                None => Some(Mismatch::new(
                    ErrorKind::AttributeMissing,
                    Description::new("not be", "missing"),
                )),
            };
            if let Some(m) = failure {
                return Ok(Some(
                    m.at(Segment::Attr(key.clone()))
                        .at(Segment::Accessor("dimnames")),
                ));
            }
        }
        if tlist.is_empty() {
            return Ok(None);
        }
        if let Some(tnames) = tnames {
            if let Some(m) = self.names_alike(tnames, cnames)? {
                return Ok(Some(
                    m.at(Segment::Accessor("names"))
                        .at(Segment::Accessor("dimnames")),
                ));
            }
        }
        let rank = tlist.len();
        for (i, (t, c)) in tlist.iter().zip(clist).enumerate() {
            if t.is_null() {
                continue;
            }
            let Some(m) = self.names_alike(t, Some(c))? else {
                continue;
            };
            let m = match (rank, i) {
                (2, 0) => m.at(Segment::Accessor("rownames")),
                (2, _) => m.at(Segment::Accessor("colnames")),
                _ => m
                    .at(Segment::Element(i + 1))
                    .at(Segment::Accessor("dimnames")),
            };
            return Ok(Some(m));
        }
        Ok(None)
    }

    fn whole_dimnames(&mut self, tval: &Value, cval: &Value) -> AlikeResult<Option<Mismatch>> {
        Ok(self
            .alike_rec(tval, cval)?
            .into_mismatch()
            .map(|m| m.at(Segment::Accessor("dimnames"))))
    }

    // === tsp ===

    /// Time-series parameters (start, end, frequency); a zero target entry
    /// matches any value.
    fn tsp_alike(
        &mut self,
        name: &Symbol,
        tval: &Value,
        cval: Option<&Value>,
    ) -> AlikeResult<Option<Mismatch>> {
        let (Some(t), Some(c)) = (tval.as_reals(), cval.and_then(Value::as_reals)) else {
            return self.generic_alike(name, tval, cval);
        };
        if t.len() != 3 || c.len() != 3 {
            return self.generic_alike(name, tval, cval);
        }
        let strict = self.settings.is_strict();
        let found = t
            .iter()
            .zip(c)
            .enumerate()
            .find(|(_, (t, c))| (strict || **t != 0.0) && t != c);
        Ok(found.map(|(i, (&t, &c))| {
            Mismatch::new(
                ErrorKind::TimeSeriesParamMismatch,
                Description::new("be", format_real(t)),
            )
            .with_current(Description::new("is", format_real(c)))
            .at(Segment::Subset(i + 1))
            .at(Segment::Accessor("tsp"))
        }))
    }

    // === everything else ===

    /// Attributes without a dedicated rule must be alike as values. In
    /// default mode a zero-length target attribute is not checked.
    fn generic_alike(
        &mut self,
        name: &Symbol,
        tval: &Value,
        cval: Option<&Value>,
    ) -> AlikeResult<Option<Mismatch>> {
        if self.settings.attr_mode == AttrMode::Default && tval.is_empty() {
            return Ok(None);
        }
        // absence is reported with presence priority
        let Some(cval) = cval else {
            return Ok(None);
        };
        let segment = attr_segment(name);
        if let Some(m) = self.type_mismatch(tval, cval) {
            return Ok(Some(m.with_kind(ErrorKind::AttributeTypeMismatch).at(segment)));
        }
        let sequence = tval.is_atomic() || tval.as_list().is_some();
        let (tl, cl) = (tval.len(), cval.len());
        if sequence && tl != cl {
            return Ok(Some(
                Mismatch::new(ErrorKind::LengthMismatch, Description::new("be", tl.to_string()))
                    .with_current(Description::new("is", cl.to_string()))
                    .at(Segment::Accessor("length"))
                    .at(segment),
            ));
        }
        Ok(self
            .alike_rec(tval, cval)?
            .into_mismatch()
            .map(|m| m.at(segment)))
    }
}

/// With no target attributes, strict mode still checks the current's class
/// against the target's implicit class, and reports the extra attributes.
fn scan_reverse(target: &Value, current: &Value, slots: &mut PrioritySlots, data_frame: &mut bool) {
    for (name, cval) in current.attrs.iter() {
        if name.attr_kind() == AttrKind::Class {
            if let Some(current_class) = cval.as_strings() {
                if let Some(m) = class_mismatch(&target.class(), current_class, data_frame) {
                    slots.record(Priority::Class, m);
                }
            }
        }
        slots.record(
            Priority::Presence,
            Mismatch::new(
                ErrorKind::AttributeMissing,
                Description::new("not have", "attributes"),
            )
            .with_current(Description::new(
                "has",
                format!("attribute {}", quote_str(name.as_str())),
            )),
        );
    }
}

/// Class vectors are compared right-aligned: the current may prepend extra
/// classes (subclasses), but its last classes must equal the target's.
/// Sets `data_frame` when a compared target class is `data.frame`.
pub fn class_mismatch(target: &[String], current: &[String], data_frame: &mut bool) -> Option<Mismatch> {
    let (tl, cl) = (target.len(), current.len());
    let stop = tl.min(cl);
    let offset = cl - stop;
    let mut failure = None;
    for (ti, ci) in (0..stop).zip(offset..cl) {
        if target[ti] == "data.frame" {
            *data_frame = true;
        }
        if failure.is_none() && target[ti] != current[ci] {
            failure = Some((ti, ci));
        }
    }
    if let Some((ti, ci)) = failure {
        let m = if cl > 1 {
            Mismatch::new(
                ErrorKind::ClassMismatch,
                Description::new("be", quote_str(&target[ti])),
            )
            .with_current(Description::new("is", quote_str(&current[ci])))
            .at(Segment::Subset(ci + 1))
            .at(Segment::Accessor("class"))
        } else {
            Mismatch::new(
                ErrorKind::ClassMismatch,
                Description::new("be", format!("class {}", quote_str(&target[ti]))),
            )
            .with_current(Description::new("is", quote_str(&current[ci])))
        };
        return Some(m);
    }
    if tl > cl {
        return Some(Mismatch::new(
            ErrorKind::ClassMismatch,
            Description::new("inherit", format!("from class {}", quote_str(&target[cl]))),
        ));
    }
    None
}

/// Shape name for a number of dimensions.
fn shape(rank: usize) -> &'static str {
    match rank {
        0 | 1 => "vector",
        2 => "matrix",
        _ => "array",
    }
}

/// Whether the dims make target and current different kinds of object
/// (matrix vs vector, matrix vs array, atomic vs list). Returns the target
/// and current descriptions.
fn implicit_class_change(
    tdim: &[i32],
    cdim: Option<&[i32]>,
    target: &Value,
    current: &Value,
) -> Option<(String, String)> {
    let trank = tdim.len().min(3);
    let crank = cdim.map_or(0, |d| d.len().min(3));
    if trank > 1 && target.is_atomic() {
        if cdim.is_none() {
            return Some((shape(trank).to_string(), current.mode().to_string()));
        }
        if current.is_atomic() && crank != trank {
            return Some((shape(trank).to_string(), shape(crank).to_string()));
        }
        if !current.is_atomic() {
            return Some((target.mode().to_string(), current.type_name().to_string()));
        }
    } else if crank > 1 && current.is_atomic() {
        return Some((target.mode().to_string(), shape(crank).to_string()));
    }
    None
}

fn attr_segment(name: &Symbol) -> Segment {
    let kind = name.attr_kind();
    if kind.has_accessor() {
        Segment::Accessor(kind.name())
    } else {
        Segment::Attr(name.clone())
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alike::alike;
    use crate::settings::Settings;
    use alike_value::ScopeArena;

    fn strings(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    fn compare_with(target: &Value, current: &Value, settings: &Settings) -> Comparison {
        let scopes = ScopeArena::new();
        alike(target, current, &scopes, settings).expect("comparison runs")
    }

    fn compare(target: &Value, current: &Value) -> Comparison {
        compare_with(target, current, &Settings::default())
    }

    fn message(target: &Value, current: &Value) -> Option<String> {
        compare(target, current).render("x", &Settings::default())
    }

    #[test]
    fn test_class_suffix_rule() {
        let mut df = false;
        assert!(class_mismatch(&strings(&["b", "c"]), &strings(&["a", "b", "c"]), &mut df).is_none());

        let m = class_mismatch(&strings(&["b", "c"]), &strings(&["a", "x", "c"]), &mut df)
            .expect("suffix differs");
        assert_eq!(m.path.render("x"), "class(x)[2]");
        assert_eq!(m.fragments(), ["be", "\"b\"", "is", "\"x\""]);

        let m = class_mismatch(&strings(&["a", "b"]), &strings(&["b"]), &mut df)
            .expect("target has more classes");
        assert_eq!(m.target.verb, "inherit");
        assert_eq!(m.target.text, "from class \"b\"");
    }

    #[test]
    fn test_class_data_frame_hint() {
        let mut df = false;
        class_mismatch(&strings(&["data.frame"]), &strings(&["tbl", "data.frame"]), &mut df);
        assert!(df);
        let target = Value::list([]).with_class(["data.frame"]);
        let current = Value::list([]).with_class(["tbl_df", "data.frame"]);
        let result = compare(&target, &current);
        assert!(result.success());
        assert!(result.data_frame());
    }

    #[test]
    fn test_single_class_message() {
        let target = Value::integer([1]).with_class(["foo"]);
        let current = Value::integer([1]).with_class(["bar"]);
        assert_eq!(
            message(&target, &current),
            Some("`x` should be class \"foo\" (is \"bar\")".to_string())
        );
        // implicit class of the current is used when it has none
        assert_eq!(
            message(&target, &Value::integer([1])),
            Some("`x` should be class \"foo\" (is \"integer\")".to_string())
        );
    }

    #[test]
    fn test_dim_wildcards() {
        let target = Value::integer([]).with_dim([0, 3]);
        let current = Value::integer([1, 2, 3, 4, 5, 6]).with_dim([2, 3]);
        assert!(compare(&target, &current).success());

        let wide = Value::integer([0; 8]).with_dim([2, 4]);
        assert_eq!(
            message(&target, &wide),
            Some("`x` should have 3 columns (has 4)".to_string())
        );
    }

    #[test]
    fn test_dim_reports_dimension() {
        let target = Value::integer([]).with_dim([3, 4, 2]);
        let current = Value::integer([]).with_dim([3, 5, 2]);
        let result = compare(&target, &current);
        assert_eq!(result.kind(), Some(ErrorKind::DimensionMismatch));
        assert_eq!(
            result.render("x", &Settings::default()),
            Some("`x` should have size 4 at dimension 2 (has 5)".to_string())
        );
    }

    #[test]
    fn test_matrix_vs_vector_is_a_class_failure() {
        let target = Value::integer([]).with_dim([0, 0]);
        let result = compare(&target, &Value::integer([1, 2]));
        assert_eq!(result.kind(), Some(ErrorKind::ClassMismatch));
        assert_eq!(result.priority(), Some(Priority::Class));
        assert_eq!(
            result.render("x", &Settings::default()),
            Some("`x` should be \"matrix\" (is \"numeric\")".to_string())
        );
    }

    #[test]
    fn test_names_wildcard() {
        let target = Value::integer([1, 2]).with_names(["", "b"]);
        let current = Value::integer([1, 2]).with_names(["a", "b"]);
        assert!(compare(&target, &current).success());

        let strict = Settings::with_attr_mode(AttrMode::Strict);
        let result = compare_with(&target, &current, &strict);
        assert_eq!(result.kind(), Some(ErrorKind::NameMismatch));
        assert_eq!(
            result.mismatch().map(|m| m.path.render("x")),
            Some("names(x)[1]".to_string())
        );

        let renamed = Value::integer([1, 2]).with_names(["a", "c"]);
        assert_eq!(
            message(&target, &renamed),
            Some("`names(x)[2]` should be \"b\" (is \"c\")".to_string())
        );
    }

    #[test]
    fn test_missing_names() {
        let target = Value::integer([1]).with_names(["a"]);
        assert_eq!(
            message(&target, &Value::integer([1])),
            Some("`names(x)` should be type \"character\" (is \"NULL\")".to_string())
        );
    }

    #[test]
    fn test_tsp_wildcard() {
        let target = Value::real([]).with_attr("tsp", Value::real([0.0, 0.0, 12.0]));
        let monthly = Value::real([1.0; 24]).with_attr("tsp", Value::real([2000.0, 2001.0, 12.0]));
        assert!(compare(&target, &monthly).success());

        let quarterly = Value::real([1.0; 8]).with_attr("tsp", Value::real([2000.0, 2001.75, 4.0]));
        let result = compare(&target, &quarterly);
        assert_eq!(result.kind(), Some(ErrorKind::TimeSeriesParamMismatch));
        assert_eq!(
            result.render("x", &Settings::default()),
            Some("`tsp(x)[3]` should be 12 (is 4)".to_string())
        );
    }

    #[test]
    fn test_class_outranks_names() {
        let target = Value::integer([1]).with_names(["a"]).with_class(["foo"]);
        let current = Value::integer([1]).with_names(["b"]).with_class(["bar"]);
        assert_eq!(compare(&target, &current).kind(), Some(ErrorKind::ClassMismatch));
    }

    #[test]
    fn test_generic_attribute_rules() {
        let target = Value::integer([1]).with_attr("units", Value::character(["m", "s"]));
        let short = Value::integer([1]).with_attr("units", Value::character(["m"]));
        assert_eq!(
            message(&target, &short),
            Some("`length(attr(x, \"units\"))` should be 2 (is 1)".to_string())
        );
        let wrong_type = Value::integer([1]).with_attr("units", Value::integer([1, 2]));
        assert_eq!(
            compare(&target, &wrong_type).kind(),
            Some(ErrorKind::AttributeTypeMismatch)
        );
        assert_eq!(
            message(&target, &Value::integer([1])),
            Some("`x` should have attribute \"units\"".to_string())
        );
    }

    #[test]
    fn test_zero_length_attribute_modes() {
        let target = Value::integer([1]).with_attr("units", Value::character(Vec::<String>::new()));
        let current = Value::integer([1]).with_attr("units", Value::character(["m"]));
        assert!(compare(&target, &current).success());
        let extended = Settings::with_attr_mode(AttrMode::Extended);
        assert_eq!(
            compare_with(&target, &current, &extended).kind(),
            Some(ErrorKind::LengthMismatch)
        );
    }

    #[test]
    fn test_empty_target_attribute_may_be_absent() {
        let target = Value::integer([1]).with_attr("units", Value::character(Vec::<String>::new()));
        assert!(compare(&target, &Value::integer([1])).success());

        let extended = Settings::with_attr_mode(AttrMode::Extended);
        assert_eq!(
            compare_with(&target, &Value::integer([1]), &extended).kind(),
            Some(ErrorKind::AttributeMissing)
        );
    }

    #[test]
    fn test_implicit_class_satisfies_target_class() {
        let target = Value::integer([]).with_dim([0, 2]).with_class(["matrix", "array"]);
        let current = Value::integer([1, 2, 3, 4]).with_dim([2, 2]);
        assert!(compare(&target, &current).success());

        let vector = Value::integer([1, 2]);
        assert_eq!(compare(&target, &vector).kind(), Some(ErrorKind::ClassMismatch));

        let strict = Settings::with_attr_mode(AttrMode::Strict);
        assert!(!compare_with(&target, &current, &strict).success());
    }

    #[test]
    fn test_negative_dim_message() {
        let target = Value::integer([]).with_dim([-1, 2]);
        let current = Value::integer([1, 2]).with_dim([1, 2]);
        assert_eq!(
            message(&target, &current),
            Some("`x` should have -1 row (has 1)".to_string())
        );
    }

    #[test]
    fn test_srcref_skipped_by_default() {
        let target = Value::integer([1]).with_attr("srcref", Value::integer([1, 2, 3]));
        let current = Value::integer([1]).with_attr("srcref", Value::character(["x"]));
        assert!(compare(&target, &current).success());
        assert!(compare(&target, &Value::integer([1])).success());
        let extended = Settings::with_attr_mode(AttrMode::Extended);
        assert!(compare_with(&target, &Value::integer([1]), &extended).success());
        assert_eq!(
            compare_with(&target, &current, &extended).kind(),
            Some(ErrorKind::AttributeTypeMismatch)
        );
    }

    #[test]
    fn test_extra_attributes() {
        let current = Value::integer([1]).with_attr("units", Value::character(["m"]));
        assert!(compare(&Value::integer([1]), &current).success());

        let strict = Settings::with_attr_mode(AttrMode::Strict);
        assert_eq!(
            compare_with(&Value::integer([1]), &current, &strict).render("x", &strict),
            Some("`x` should not have attributes (has attribute \"units\")".to_string())
        );
    }

    #[test]
    fn test_strict_reverse_checks_implicit_class() {
        let strict = Settings::with_attr_mode(AttrMode::Strict);
        let subclass = Value::integer([1]).with_class(["myint", "integer"]);
        let result = compare_with(&Value::integer([1]), &subclass, &strict);
        assert_eq!(result.priority(), Some(Priority::Presence));

        let other = Value::integer([1]).with_class(["foo"]);
        let result = compare_with(&Value::integer([1]), &other, &strict);
        assert_eq!(result.kind(), Some(ErrorKind::ClassMismatch));
    }

    #[test]
    fn test_dimnames_rules() {
        let target = Value::integer([])
            .with_dim([0, 2])
            .with_attr(
                "dimnames",
                Value::list([Value::null(), Value::character(["a", "b"])]),
            );
        let current = Value::integer([1, 2, 3, 4])
            .with_dim([2, 2])
            .with_attr(
                "dimnames",
                Value::list([Value::character(["r1", "r2"]), Value::character(["a", "z"])]),
            );
        let result = compare(&target, &current);
        assert_eq!(result.priority(), Some(Priority::DimNames));
        assert_eq!(
            result.render("x", &Settings::default()),
            Some("`colnames(x)[2]` should be \"b\" (is \"z\")".to_string())
        );
    }

    #[test]
    fn test_levels() {
        let target = Value::integer([]).with_attr("levels", Value::character(["lo", "hi"]));
        let current = Value::integer([1]).with_attr("levels", Value::character(["lo", "mid"]));
        assert_eq!(
            message(&target, &current),
            Some("`levels(x)[2]` should be \"hi\" (is \"mid\")".to_string())
        );
    }

    #[test]
    fn test_strict_attribute_count() {
        let strict = Settings::with_attr_mode(AttrMode::Strict);
        let target = Value::integer([1]).with_names(["a"]);
        let current = Value::integer([1])
            .with_names(["a"])
            .with_attr("units", Value::character(["m"]));
        let result = compare_with(&target, &current, &strict);
        assert_eq!(result.priority(), Some(Priority::Presence));
        assert_eq!(
            result.render("x", &strict),
            Some("`x` should have 1 attribute (has 2)".to_string())
        );
    }
}

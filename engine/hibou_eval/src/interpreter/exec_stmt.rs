//! Statement execution and declaration hoisting.

use super::pattern::{pattern_names, BindMode};
use super::{Completion, Frame, Interpreter, JsResult};
use crate::env::Environment;
use crate::value::Value;
use hibou_ir::{
    CatchClause, DeclKind, ForHead, ForInit, Name, PatternKind, StmtId, StmtKind, SwitchCase,
};
use hibou_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

/// How a loop body completion affects the loop.
enum LoopFlow {
    Next,
    Exit,
    Propagate(Completion),
}

impl Interpreter {
    /// Block-entry hoisting: lexical declarations enter their temporal
    /// dead zone, function declarations bind eagerly.
    pub(crate) fn hoist_block(&mut self, frame: &Frame, body: &[StmtId]) -> JsResult<()> {
        for &stmt in body {
            match &frame.program.arena.stmt(stmt).kind {
                StmtKind::VarDecl {
                    kind: kind @ (DeclKind::Let | DeclKind::Const),
                    declarators,
                } => {
                    let mutable = *kind == DeclKind::Let;
                    let mut names = Vec::new();
                    for declarator in declarators {
                        pattern_names(&frame.program.arena, declarator.pattern, &mut names);
                    }
                    let mut scope = frame.env.borrow_mut();
                    for name in names {
                        scope.declare_uninitialized(name, mutable);
                    }
                }
                StmtKind::FunctionDecl(func) => {
                    let function = frame.program.arena.function(*func);
                    if let Some(name) = function.name {
                        let value = self.make_function(&frame.program, *func, &frame.env);
                        frame
                            .env
                            .borrow_mut()
                            .declare(name, Value::Object(value), true);
                    }
                }
                StmtKind::ClassDecl(class) => {
                    if let Some(name) = frame.program.arena.class(*class).name {
                        frame.env.borrow_mut().declare_uninitialized(name, true);
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Function-entry hoisting: `var` declarations anywhere in the scope
    /// (not crossing function boundaries) bind to `undefined`.
    pub(crate) fn hoist_vars(&mut self, frame: &Frame, body: &[StmtId]) {
        let mut names = Vec::new();
        for &stmt in body {
            collect_var_names(&frame.program.arena, stmt, &mut names);
        }
        let mut scope = frame.env.borrow_mut();
        for name in names {
            scope.declare_var(name);
        }
    }

    pub(crate) fn exec_stmt(&mut self, frame: &Frame, stmt: StmtId) -> JsResult<Completion> {
        ensure_sufficient_stack(|| self.exec_stmt_inner(frame, stmt))
    }

    fn exec_stmt_inner(&mut self, frame: &Frame, stmt: StmtId) -> JsResult<Completion> {
        match &frame.program.arena.stmt(stmt).kind {
            StmtKind::Expr(expr) => {
                let value = self.eval_expr(frame, *expr)?;
                Ok(Completion::Normal(Some(value)))
            }
            StmtKind::Empty | StmtKind::FunctionDecl(_) => Ok(Completion::Normal(None)),
            StmtKind::VarDecl { kind, declarators } => {
                let mode = match kind {
                    DeclKind::Var => BindMode::Var,
                    DeclKind::Let | DeclKind::Const => BindMode::LexicalInit,
                };
                for declarator in declarators {
                    match declarator.init {
                        Some(init) => {
                            let value = self.eval_expr(frame, init)?;
                            if let PatternKind::Ident(name) =
                                &frame.program.arena.pattern(declarator.pattern).kind
                            {
                                if super::exec_expr::is_anonymous_fn(&frame.program, init) {
                                    let text = self.interner.lookup(*name);
                                    self.name_anonymous_function(&value, text);
                                }
                            }
                            self.bind_pattern(frame, declarator.pattern, value, mode)?;
                        }
                        // `var x;` keeps the hoisted undefined; `let x;`
                        // leaves its dead zone here.
                        None => {
                            if mode == BindMode::LexicalInit {
                                self.bind_pattern(
                                    frame,
                                    declarator.pattern,
                                    Value::Undefined,
                                    mode,
                                )?;
                            }
                        }
                    }
                }
                Ok(Completion::Normal(None))
            }
            StmtKind::ClassDecl(class) => {
                let value = self.eval_class(frame, *class)?;
                if let Some(name) = frame.program.arena.class(*class).name {
                    frame.env.borrow_mut().initialize(name, value);
                }
                Ok(Completion::Normal(None))
            }
            StmtKind::Return(expr) => {
                let value = match expr {
                    Some(expr) => self.eval_expr(frame, *expr)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            StmtKind::Throw(expr) => {
                let value = self.eval_expr(frame, *expr)?;
                Err(value)
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if self.eval_expr(frame, *cond)?.to_boolean() {
                    self.exec_stmt(frame, *then_branch)
                } else if let Some(else_branch) = else_branch {
                    self.exec_stmt(frame, *else_branch)
                } else {
                    Ok(Completion::Normal(None))
                }
            }
            StmtKind::Block(body) => self.exec_block_stmts(frame, body),
            StmtKind::Break(label) => Ok(Completion::Break(*label)),
            StmtKind::Continue(label) => Ok(Completion::Continue(*label)),
            StmtKind::Labeled { .. } => self.exec_labeled(frame, stmt),
            StmtKind::While { .. }
            | StmtKind::DoWhile { .. }
            | StmtKind::For { .. }
            | StmtKind::ForIn { .. }
            | StmtKind::ForOf { .. } => self.exec_loop(frame, stmt, &[]),
            StmtKind::Switch { discriminant, cases } => {
                self.exec_switch(frame, *discriminant, cases, &[])
            }
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => self.exec_try(frame, block, handler.as_ref(), finalizer.as_deref()),
        }
    }

    /// Run a statement list in a fresh block scope.
    pub(crate) fn exec_block_stmts(
        &mut self,
        frame: &Frame,
        body: &[StmtId],
    ) -> JsResult<Completion> {
        let block = frame.with_env(Environment::child(&frame.env));
        self.hoist_block(&block, body)?;
        self.exec_stmt_list(&block, body)
    }

    /// Run statements in the given frame without a new scope. The
    /// completion value is the last expression statement's value.
    pub(crate) fn exec_stmt_list(&mut self, frame: &Frame, body: &[StmtId]) -> JsResult<Completion> {
        let mut last = None;
        for &stmt in body {
            match self.exec_stmt(frame, stmt)? {
                Completion::Normal(Some(value)) => last = Some(value),
                Completion::Normal(None) => {}
                abrupt => return Ok(abrupt),
            }
        }
        Ok(Completion::Normal(last))
    }

    /// Peel nested labels off a labeled statement and run the body with
    /// them attached.
    fn exec_labeled(&mut self, frame: &Frame, stmt: StmtId) -> JsResult<Completion> {
        let mut labels = Vec::new();
        let mut inner = stmt;
        while let StmtKind::Labeled { label, body } = &frame.program.arena.stmt(inner).kind {
            labels.push(*label);
            inner = *body;
        }
        match &frame.program.arena.stmt(inner).kind {
            StmtKind::While { .. }
            | StmtKind::DoWhile { .. }
            | StmtKind::For { .. }
            | StmtKind::ForIn { .. }
            | StmtKind::ForOf { .. } => self.exec_loop(frame, inner, &labels),
            StmtKind::Switch { discriminant, cases } => {
                self.exec_switch(frame, *discriminant, cases, &labels)
            }
            _ => match self.exec_stmt(frame, inner)? {
                Completion::Break(Some(label)) if labels.contains(&label) => {
                    Ok(Completion::Normal(None))
                }
                completion => Ok(completion),
            },
        }
    }

    fn loop_flow(&self, completion: Completion, labels: &[Name]) -> LoopFlow {
        match completion {
            Completion::Normal(_) => LoopFlow::Next,
            Completion::Continue(None) => LoopFlow::Next,
            Completion::Continue(Some(label)) if labels.contains(&label) => LoopFlow::Next,
            Completion::Break(None) => LoopFlow::Exit,
            Completion::Break(Some(label)) if labels.contains(&label) => LoopFlow::Exit,
            abrupt => LoopFlow::Propagate(abrupt),
        }
    }

    fn exec_loop(&mut self, frame: &Frame, stmt: StmtId, labels: &[Name]) -> JsResult<Completion> {
        match &frame.program.arena.stmt(stmt).kind {
            StmtKind::While { cond, body } => {
                while self.eval_expr(frame, *cond)?.to_boolean() {
                    let completion = self.exec_stmt(frame, *body)?;
                    match self.loop_flow(completion, labels) {
                        LoopFlow::Next => {}
                        LoopFlow::Exit => break,
                        LoopFlow::Propagate(completion) => return Ok(completion),
                    }
                }
                Ok(Completion::Normal(None))
            }
            StmtKind::DoWhile { body, cond } => {
                loop {
                    let completion = self.exec_stmt(frame, *body)?;
                    match self.loop_flow(completion, labels) {
                        LoopFlow::Next => {}
                        LoopFlow::Exit => break,
                        LoopFlow::Propagate(completion) => return Ok(completion),
                    }
                    if !self.eval_expr(frame, *cond)?.to_boolean() {
                        break;
                    }
                }
                Ok(Completion::Normal(None))
            }
            StmtKind::For {
                init,
                test,
                update,
                body,
            } => self.exec_for(frame, init.as_ref(), *test, *update, *body, labels),
            StmtKind::ForIn { head, object, body } => {
                self.exec_for_in(frame, head, *object, *body, labels)
            }
            StmtKind::ForOf {
                head,
                iterable,
                body,
            } => self.exec_for_of(frame, head, *iterable, *body, labels),
            _ => unreachable!("not a loop statement"),
        }
    }

    fn exec_for(
        &mut self,
        frame: &Frame,
        init: Option<&ForInit>,
        test: Option<hibou_ir::ExprId>,
        update: Option<hibou_ir::ExprId>,
        body: StmtId,
        labels: &[Name],
    ) -> JsResult<Completion> {
        let mut loop_frame = frame.with_env(Environment::child(&frame.env));
        let mut per_iteration = false;
        match init {
            Some(ForInit::Decl(decl)) => {
                self.hoist_block(&loop_frame, std::slice::from_ref(decl))?;
                self.exec_stmt(&loop_frame, *decl)?;
                per_iteration = matches!(
                    frame.program.arena.stmt(*decl).kind,
                    StmtKind::VarDecl {
                        kind: DeclKind::Let,
                        ..
                    }
                );
            }
            Some(ForInit::Expr(expr)) => {
                self.eval_expr(&loop_frame, *expr)?;
            }
            None => {}
        }
        loop {
            if let Some(test) = test {
                if !self.eval_expr(&loop_frame, test)?.to_boolean() {
                    break;
                }
            }
            let completion = self.exec_stmt(&loop_frame, body)?;
            match self.loop_flow(completion, labels) {
                LoopFlow::Next => {}
                LoopFlow::Exit => break,
                LoopFlow::Propagate(completion) => return Ok(completion),
            }
            // `let` heads get a fresh binding copy per iteration, so
            // closures created in the body capture distinct variables.
            if per_iteration {
                loop_frame = frame.with_env(Environment::fork(&loop_frame.env));
            }
            if let Some(update) = update {
                self.eval_expr(&loop_frame, update)?;
            }
        }
        Ok(Completion::Normal(None))
    }

    /// Bind one iteration's value for a `for..in`/`for..of` head.
    fn bind_for_head(&mut self, frame: &Frame, head: &ForHead, value: Value) -> JsResult<Frame> {
        match head {
            ForHead::Decl { kind, pattern } => {
                let iter_frame = frame.with_env(Environment::child(&frame.env));
                match kind {
                    DeclKind::Var => {
                        self.bind_pattern(&iter_frame, *pattern, value, BindMode::Var)?;
                    }
                    DeclKind::Let | DeclKind::Const => {
                        let mut names = Vec::new();
                        pattern_names(&frame.program.arena, *pattern, &mut names);
                        {
                            let mut scope = iter_frame.env.borrow_mut();
                            for name in names {
                                scope.declare_uninitialized(name, *kind == DeclKind::Let);
                            }
                        }
                        self.bind_pattern(&iter_frame, *pattern, value, BindMode::LexicalInit)?;
                    }
                }
                Ok(iter_frame)
            }
            ForHead::Pattern(pattern) => {
                self.bind_pattern(frame, *pattern, value, BindMode::Assign)?;
                Ok(frame.clone())
            }
        }
    }

    fn exec_for_in(
        &mut self,
        frame: &Frame,
        head: &ForHead,
        object: hibou_ir::ExprId,
        body: StmtId,
        labels: &[Name],
    ) -> JsResult<Completion> {
        let target = self.eval_expr(frame, object)?;
        // Enumerating a nullish value visits nothing.
        let Some(start) = target.as_object() else {
            return Ok(Completion::Normal(None));
        };
        // Snapshot: own enumerable keys first, then up the prototype
        // chain, each key visited once.
        let mut keys = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = Some(start);
        while let Some(handle) = current {
            let object = self.heap.get(handle);
            for key in object.own_keys(true) {
                let text = key.as_display();
                if seen.insert(text.clone()) {
                    keys.push(text);
                }
            }
            current = object.proto;
        }
        for key in keys {
            let iter_frame = self.bind_for_head(frame, head, Value::string(&key))?;
            let completion = self.exec_stmt(&iter_frame, body)?;
            match self.loop_flow(completion, labels) {
                LoopFlow::Next => {}
                LoopFlow::Exit => break,
                LoopFlow::Propagate(completion) => return Ok(completion),
            }
        }
        Ok(Completion::Normal(None))
    }

    fn exec_for_of(
        &mut self,
        frame: &Frame,
        head: &ForHead,
        iterable: hibou_ir::ExprId,
        body: StmtId,
        labels: &[Name],
    ) -> JsResult<Completion> {
        let target = self.eval_expr(frame, iterable)?;
        let mut items = Vec::new();
        self.spread_into(&target, &mut items)?;
        for item in items {
            let iter_frame = self.bind_for_head(frame, head, item)?;
            let completion = self.exec_stmt(&iter_frame, body)?;
            match self.loop_flow(completion, labels) {
                LoopFlow::Next => {}
                LoopFlow::Exit => break,
                LoopFlow::Propagate(completion) => return Ok(completion),
            }
        }
        Ok(Completion::Normal(None))
    }

    fn exec_switch(
        &mut self,
        frame: &Frame,
        discriminant: hibou_ir::ExprId,
        cases: &[SwitchCase],
        labels: &[Name],
    ) -> JsResult<Completion> {
        let value = self.eval_expr(frame, discriminant)?;
        let switch_frame = frame.with_env(Environment::child(&frame.env));
        let combined: Vec<StmtId> = cases.iter().flat_map(|c| c.body.iter().copied()).collect();
        self.hoist_block(&switch_frame, &combined)?;

        // Tests run in source order; `default` only wins when nothing
        // matches, even if it appears before matching cases.
        let mut start = None;
        for (index, case) in cases.iter().enumerate() {
            if let Some(test) = case.test {
                let test_value = self.eval_expr(&switch_frame, test)?;
                if value.strict_equals(&test_value) {
                    start = Some(index);
                    break;
                }
            }
        }
        let start = match start.or_else(|| cases.iter().position(|c| c.test.is_none())) {
            Some(index) => index,
            None => return Ok(Completion::Normal(None)),
        };

        let mut last = None;
        for case in &cases[start..] {
            for &stmt in &case.body {
                match self.exec_stmt(&switch_frame, stmt)? {
                    Completion::Normal(Some(value)) => last = Some(value),
                    Completion::Normal(None) => {}
                    Completion::Break(None) => return Ok(Completion::Normal(last)),
                    Completion::Break(Some(label)) if labels.contains(&label) => {
                        return Ok(Completion::Normal(last))
                    }
                    abrupt => return Ok(abrupt),
                }
            }
        }
        Ok(Completion::Normal(last))
    }

    fn exec_try(
        &mut self,
        frame: &Frame,
        block: &[StmtId],
        handler: Option<&CatchClause>,
        finalizer: Option<&[StmtId]>,
    ) -> JsResult<Completion> {
        let mut outcome = self.exec_block_stmts(frame, block);
        if let (Err(thrown), Some(handler)) = (&outcome, handler) {
            let thrown = thrown.clone();
            let catch_frame = frame.with_env(Environment::child(&frame.env));
            let bound = match handler.param {
                Some(param) => self.bind_pattern(&catch_frame, param, thrown, BindMode::Param),
                None => Ok(()),
            };
            outcome = match bound {
                Ok(()) => {
                    self.hoist_block(&catch_frame, &handler.body)
                        .and_then(|()| self.exec_stmt_list(&catch_frame, &handler.body))
                }
                Err(rethrown) => Err(rethrown),
            };
        }
        if let Some(finalizer) = finalizer {
            match self.exec_block_stmts(frame, finalizer)? {
                // A normal finally preserves the try/catch outcome; an
                // abrupt one overrides it.
                Completion::Normal(_) => {}
                abrupt => return Ok(abrupt),
            }
        }
        outcome
    }
}

/// Collect `var`-declared names reachable from a statement without
/// crossing a function or class boundary.
fn collect_var_names(arena: &hibou_ir::ProgramArena, stmt: StmtId, out: &mut Vec<Name>) {
    match &arena.stmt(stmt).kind {
        StmtKind::VarDecl {
            kind: DeclKind::Var,
            declarators,
        } => {
            for declarator in declarators {
                pattern_names(arena, declarator.pattern, out);
            }
        }
        StmtKind::VarDecl { .. }
        | StmtKind::Expr(_)
        | StmtKind::FunctionDecl(_)
        | StmtKind::ClassDecl(_)
        | StmtKind::Return(_)
        | StmtKind::Throw(_)
        | StmtKind::Break(_)
        | StmtKind::Continue(_)
        | StmtKind::Empty => {}
        StmtKind::Block(body) => {
            for &inner in body {
                collect_var_names(arena, inner, out);
            }
        }
        StmtKind::If {
            then_branch,
            else_branch,
            ..
        } => {
            collect_var_names(arena, *then_branch, out);
            if let Some(else_branch) = else_branch {
                collect_var_names(arena, *else_branch, out);
            }
        }
        StmtKind::While { body, .. }
        | StmtKind::DoWhile { body, .. }
        | StmtKind::Labeled { body, .. } => collect_var_names(arena, *body, out),
        StmtKind::For { init, body, .. } => {
            if let Some(ForInit::Decl(decl)) = init {
                collect_var_names(arena, *decl, out);
            }
            collect_var_names(arena, *body, out);
        }
        StmtKind::ForIn { head, body, .. } | StmtKind::ForOf { head, body, .. } => {
            if let ForHead::Decl {
                kind: DeclKind::Var,
                pattern,
            } = head
            {
                pattern_names(arena, *pattern, out);
            }
            collect_var_names(arena, *body, out);
        }
        StmtKind::Switch { cases, .. } => {
            for case in cases {
                for &inner in &case.body {
                    collect_var_names(arena, inner, out);
                }
            }
        }
        StmtKind::Try {
            block,
            handler,
            finalizer,
        } => {
            for &inner in block {
                collect_var_names(arena, inner, out);
            }
            if let Some(handler) = handler {
                for &inner in &handler.body {
                    collect_var_names(arena, inner, out);
                }
            }
            if let Some(finalizer) = finalizer {
                for &inner in finalizer {
                    collect_var_names(arena, inner, out);
                }
            }
        }
    }
}

//! LLVM IR generation for varlang programs using Inkwell.
//!
//! All statements are lowered into a single `void main()` whose entry block
//! is created up front. Variable slots are allocated at the top of that block
//! so LLVM's mem2reg can promote them.

use std::collections::HashMap;
use std::path::Path;

use inkwell::{
    basic_block::BasicBlock,
    builder::Builder,
    context::Context as LlvmContext,
    module::{Linkage, Module},
    targets::{CodeModel, FileType, InitializationConfig, RelocMode, Target, TargetMachine, TargetTriple},
    types::{BasicType, BasicTypeEnum},
    values::{BasicMetadataValueEnum, BasicValueEnum, FunctionValue, PointerValue},
    AddressSpace, OptimizationLevel,
};
use tracing::debug;

use crate::ast::{Node, Program, TypeTag};
use crate::config::CompileOptions;
use crate::error::{CodegenError, CompileResult, SemanticError};

/// Stack slot backing one declared variable.
#[derive(Debug, Clone, Copy)]
pub struct Slot<'ctx> {
    pub ptr: PointerValue<'ctx>,
    pub ty: BasicTypeEnum<'ctx>,
}

/// Variable name to stack slot, scoped to one codegen pass.
#[derive(Debug, Default)]
pub struct ValueTable<'ctx> {
    slots: HashMap<String, Slot<'ctx>>,
}

impl<'ctx> ValueTable<'ctx> {
    pub fn get(&self, name: &str) -> Option<Slot<'ctx>> {
        self.slots.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn insert(&mut self, name: &str, slot: Slot<'ctx>) {
        self.slots.insert(name.to_string(), slot);
    }
}

/// printf format, one per runtime value category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PrintFormat {
    Int,
    Float,
    Double,
}

impl PrintFormat {
    fn spec(self) -> &'static str {
        match self {
            PrintFormat::Int => "%d\n",
            PrintFormat::Float | PrintFormat::Double => "%f\n",
        }
    }

    fn global_name(self) -> &'static str {
        match self {
            PrintFormat::Int => ".str_int",
            PrintFormat::Float => ".str_float",
            PrintFormat::Double => ".str_double",
        }
    }
}

/// Generates LLVM IR into `main`, tracking variable slots and the lazily
/// declared printf machinery.
pub struct Codegen<'ctx> {
    ctx: &'ctx LlvmContext,
    builder: Builder<'ctx>,
    module: Module<'ctx>,
    entry: BasicBlock<'ctx>,
    values: ValueTable<'ctx>,
    printf: Option<FunctionValue<'ctx>>,
    formats: HashMap<PrintFormat, PointerValue<'ctx>>,
}

impl<'ctx> Codegen<'ctx> {
    /// Create the module and its entry procedure; the builder is left at the
    /// end of the entry block.
    pub fn new(ctx: &'ctx LlvmContext, options: &CompileOptions) -> Self {
        let module = ctx.create_module(&options.module_name);
        let builder = ctx.create_builder();

        let main_fn = module.add_function(
            &options.entry_name,
            ctx.void_type().fn_type(&[], false),
            Some(Linkage::External),
        );
        let entry = ctx.append_basic_block(main_fn, "entry");
        builder.position_at_end(entry);

        Self {
            ctx,
            builder,
            module,
            entry,
            values: ValueTable::default(),
            printf: None,
            formats: HashMap::new(),
        }
    }

    pub fn values(&self) -> &ValueTable<'ctx> {
        &self.values
    }

    /// Textual IR of everything emitted so far.
    pub fn ir(&self) -> String {
        self.module.print_to_string().to_string()
    }

    /// Emit every statement in order, stopping at the first failure.
    pub fn emit_program(&mut self, program: &Program) -> CompileResult<()> {
        for stmt in &program.stmts {
            self.emit(stmt)?;
        }
        Ok(())
    }

    /// Lower one node and return the value it produced.
    pub fn emit(&mut self, node: &Node) -> CompileResult<BasicValueEnum<'ctx>> {
        debug!(?node, "emit");
        match node {
            Node::VarDecl {
                declared_type,
                name,
                initializer,
            } => {
                let ty = self.llvm_type(*declared_type);
                let ptr = self.entry_alloca(ty, name)?;
                if let Some(init) = initializer {
                    let value = self.emit(init).map_err(|err| CodegenError::Initializer {
                        name: name.clone(),
                        source: Box::new(err),
                    })?;
                    self.builder.build_store(ptr, value)?;
                }
                self.values.insert(name, Slot { ptr, ty });
                Ok(ptr.into())
            }
            Node::NumberLiteral {
                text,
                inferred_type,
            } => self.literal(text, *inferred_type),
            Node::Assignment { name, value } => {
                let value = self.emit(value)?;
                let slot = self
                    .values
                    .get(name)
                    .ok_or_else(|| SemanticError::UndeclaredAssignment { name: name.clone() })?;
                self.builder.build_store(slot.ptr, value)?;
                Ok(value)
            }
            Node::VariableRef { name } => {
                let slot = self
                    .values
                    .get(name)
                    .ok_or_else(|| SemanticError::UnknownVariable { name: name.clone() })?;
                Ok(self.builder.build_load(slot.ptr, name)?)
            }
            Node::Print { expr } => {
                let value = self.emit(expr)?;
                self.print_value(value)
            }
        }
    }

    /// Terminate `main` and hand the module back.
    pub fn finish(self) -> CompileResult<Module<'ctx>> {
        self.builder.build_return(None)?;
        Ok(self.module)
    }

    fn llvm_type(&self, tag: TypeTag) -> BasicTypeEnum<'ctx> {
        match tag {
            TypeTag::Int32 => self.ctx.i32_type().as_basic_type_enum(),
            TypeTag::Float32 => self.ctx.f32_type().as_basic_type_enum(),
        }
    }

    // allocas always go to the top of the entry block, never the insertion point
    fn entry_alloca(&self, ty: BasicTypeEnum<'ctx>, name: &str) -> CompileResult<PointerValue<'ctx>> {
        let scratch = self.ctx.create_builder();
        match self.entry.get_first_instruction() {
            Some(first) => scratch.position_before(&first),
            None => scratch.position_at_end(self.entry),
        }
        Ok(scratch.build_alloca(ty, name)?)
    }

    fn literal(&self, text: &str, ty: TypeTag) -> CompileResult<BasicValueEnum<'ctx>> {
        let invalid = |reason: String| CodegenError::InvalidLiteral {
            text: text.to_string(),
            reason,
        };
        Ok(match ty {
            TypeTag::Int32 => {
                let v: i32 = text.parse().map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
                self.ctx.i32_type().const_int(v as i64 as u64, true).into()
            }
            TypeTag::Float32 => {
                let v: f32 = text.parse().map_err(|e: std::num::ParseFloatError| invalid(e.to_string()))?;
                if !v.is_finite() {
                    return Err(invalid("number too large to fit in f32".into()).into());
                }
                self.ctx.f32_type().const_float(f64::from(v)).into()
            }
        })
    }

    /// Pick a format from the value's runtime type and call printf with it.
    fn print_value(&mut self, value: BasicValueEnum<'ctx>) -> CompileResult<BasicValueEnum<'ctx>> {
        let f32_t = self.ctx.f32_type();
        let f64_t = self.ctx.f64_type();

        let (format, arg): (PrintFormat, BasicMetadataValueEnum<'ctx>) = match value {
            BasicValueEnum::IntValue(v) => (PrintFormat::Int, v.into()),
            BasicValueEnum::FloatValue(v) if v.get_type() == f32_t => {
                let wide = self.builder.build_float_ext(v, f64_t, "fpext")?;
                (PrintFormat::Float, wide.into())
            }
            BasicValueEnum::FloatValue(v) if v.get_type() == f64_t => (PrintFormat::Double, v.into()),
            other => {
                return Err(SemanticError::UnsupportedPrintType {
                    ty: other.get_type().print_to_string().to_string(),
                }
                .into())
            }
        };

        let printf = self.printf();
        let fmt = self.format_string(format)?;
        let call = self.builder.build_call(printf, &[fmt.into(), arg], "")?;
        call.try_as_basic_value()
            .left()
            .ok_or_else(|| CodegenError::Backend("printf call produced no value".into()).into())
    }

    // declare i32 @printf(i8*, ...) on first use
    fn printf(&mut self) -> FunctionValue<'ctx> {
        if let Some(printf) = self.printf {
            return printf;
        }
        let printf = self.module.get_function("printf").unwrap_or_else(|| {
            let i8ptr_t = self.ctx.i8_type().ptr_type(AddressSpace::default());
            let printf_ty = self.ctx.i32_type().fn_type(&[i8ptr_t.into()], true);
            self.module.add_function("printf", printf_ty, Some(Linkage::External))
        });
        self.printf = Some(printf);
        printf
    }

    fn format_string(&mut self, format: PrintFormat) -> CompileResult<PointerValue<'ctx>> {
        if let Some(ptr) = self.formats.get(&format) {
            return Ok(*ptr);
        }
        let ptr = self
            .builder
            .build_global_string_ptr(format.spec(), format.global_name())?
            .as_pointer_value();
        self.formats.insert(format, ptr);
        Ok(ptr)
    }
}

/// Verify the module and write out an object file for `triple`.
pub fn write_object(module: &Module<'_>, triple: &TargetTriple, out_obj: &Path) -> CompileResult<()> {
    module
        .verify()
        .map_err(|e| CodegenError::Backend(e.to_string()))?;
    module.set_triple(triple);

    Target::initialize_all(&InitializationConfig::default());
    let target = Target::from_triple(triple).map_err(|e| CodegenError::Object(e.to_string()))?;
    let tm = target
        .create_target_machine(
            triple,
            "generic",
            "",
            OptimizationLevel::None,
            RelocMode::Default,
            CodeModel::Default,
        )
        .ok_or_else(|| CodegenError::Object("create target machine failed".into()))?;
    tm.write_to_file(module, FileType::Object, out_obj)
        .map_err(|e| CodegenError::Object(e.to_string()))?;
    debug!(path = %out_obj.display(), "wrote object file");
    Ok(())
}

/// Grab the default target triple for the build machine.
pub fn host_triple() -> TargetTriple {
    TargetMachine::get_default_triple()
}

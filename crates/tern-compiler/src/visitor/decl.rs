//! Declaration dispatch.

use tern_syntax::{ConstDecl, Decl, ExternConstDecl, GenericDecl, ModuleDecl, StandardDecl, TypeDecl};

use super::{AtSpan, DeclarationPass, Result, declared};
use crate::signature::SignatureBuilder;

impl DeclarationPass<'_> {
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(super) fn visit_declaration(&mut self, decl: &Decl) -> Result<()> {
        self.with_position(decl.span(), |this| match decl {
            Decl::Type(d) => this.visit_type_decl(d),
            Decl::Const(d) => this.visit_const_decl(d),
            Decl::ExternConst(d) => this.visit_extern_const_decl(d),
            Decl::Standard(d) => this.visit_standard_decl(d),
            Decl::Generic(d) => this.visit_generic_decl(d),
            Decl::Specialization(d) => this.visit_specialization_decl(d),
            Decl::Module(d) => this.visit_module_decl(d),
        })
    }

    fn visit_type_decl(&mut self, decl: &TypeDecl) -> Result<()> {
        let ty = self
            .decls
            .declare_abstract_type(&decl.name, decl.extends.as_deref(), decl.generates.clone())
            .at(self.position())?;
        declared!(self, name = %decl.name, hash = ?ty, "declared abstract type");
        Ok(())
    }

    fn visit_const_decl(&mut self, decl: &ConstDecl) -> Result<()> {
        let ty = self.decls.get_type(&decl.ty).at(self.position())?;
        self.decls
            .declare_constant(&decl.name, ty, None)
            .at(self.position())?;
        declared!(self, name = %decl.name, "declared constant");
        self.visit_expression(&decl.expression)
    }

    fn visit_extern_const_decl(&mut self, decl: &ExternConstDecl) -> Result<()> {
        let ty = self.decls.get_type(&decl.ty).at(self.position())?;
        self.decls
            .declare_constant(&decl.name, ty, Some(decl.literal.clone()))
            .at(self.position())?;
        declared!(self, name = %decl.name, literal = %decl.literal, "declared external constant");
        Ok(())
    }

    fn visit_standard_decl(&mut self, decl: &StandardDecl) -> Result<()> {
        let signature = SignatureBuilder::new(self.decls)
            .build(&decl.callable.signature)
            .at(self.position())?;
        self.visit_callable(&decl.callable, signature, decl.body.as_ref())?;
        Ok(())
    }

    fn visit_generic_decl(&mut self, decl: &GenericDecl) -> Result<()> {
        self.decls
            .declare_generic(&decl.callable.name, decl.clone())
            .at(self.position())?;
        declared!(
            self,
            name = %decl.callable.name,
            parameters = ?decl.generic_parameters,
            "declared generic"
        );
        Ok(())
    }

    /// Each nested declaration is its own error-isolation unit.
    fn visit_module_decl(&mut self, decl: &ModuleDecl) -> Result<()> {
        declared!(self, name = %decl.name, "entering module");
        self.with_node_scope(decl.id, |this| {
            for nested in &decl.declarations {
                this.visit_top_level(nested);
            }
            Ok(())
        })
    }
}
